//! Headless mode for the studio.
//!
//! This module provides a simple line-oriented interface for running the
//! pipeline without a TUI. It's designed for automated testing and scripting.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use studio_core::persist;
use studio_core::{Genre, SessionError, StudioSession, Tone};

use crate::worker::SAVE_DIR;

/// Run the studio in headless mode.
///
/// Protocol:
/// - A plain line is a chapter premise and generates a scene card
/// - Lines starting with `#` are commands (draft, critique, save, quit, ...)
pub async fn run_headless(mut session: StudioSession) -> Result<(), SessionError> {
    println!("=== Novelist Studio Headless Mode ===");
    println!(
        "Project: {} ({}, {})",
        session.config().project_name,
        session.config().genre.name(),
        session.config().tone.name()
    );
    println!("Backend: {}", session.backend_name());
    println!();
    print_help();
    println!("Enter a chapter premise (one per line):");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix('#') {
            if !run_command(&mut session, rest).await {
                break;
            }
            stdout.flush().ok();
            continue;
        }

        // A plain line is a premise
        print!("[OUTLINING]");
        stdout.flush().ok();
        match session.generate_outline(line).await {
            Ok(card) => {
                print!("\r           \r");
                println!("[CARD]");
                println!("{card}");
                println!();
            }
            Err(e) => {
                print!("\r           \r");
                println!("[ERROR] {e}");
            }
        }
        stdout.flush().ok();
    }

    Ok(())
}

/// Execute a `#` command. Returns false when the session should end.
async fn run_command(session: &mut StudioSession, command: &str) -> bool {
    let parts: Vec<&str> = command.split_whitespace().collect();

    match parts.first().copied() {
        Some("quit") | Some("exit") => {
            println!("Goodbye!");
            return false;
        }
        Some("draft") => match session.write_draft().await {
            Ok(draft) => {
                println!("[DRAFT]");
                println!("{draft}");
                println!();
            }
            Err(e) => println!("[ERROR] {e}"),
        },
        Some("critique") => match session.run_critique().await {
            Ok(report) => {
                println!("[REPORT]");
                println!("{report}");
                println!();
            }
            Err(e) => println!("[ERROR] {e}"),
        },
        Some("card") => {
            // The rest of the line replaces the scene card (single-line JSON)
            let text = command.trim_start_matches("card").trim();
            if text.is_empty() {
                println!("[ERROR] Usage: #card {{\"title\": ..., \"beats\": [...]}}");
            } else {
                session.set_scene_card(text);
                println!("[CARD SET]");
            }
        }
        Some("save") => {
            let path = match parts.get(1) {
                Some(path) => PathBuf::from(path),
                None => persist::manual_save_path(SAVE_DIR, &session.config().project_name),
            };
            match session.save(&path).await {
                Ok(()) => println!("[SAVED] Project saved to {}", path.display()),
                Err(e) => println!("[ERROR] Save failed: {e}"),
            }
        }
        Some("load") => {
            // No path loads the most recent save
            let path = match parts.get(1) {
                Some(path) => Some(PathBuf::from(path)),
                None => persist::latest_save(SAVE_DIR)
                    .await
                    .ok()
                    .flatten()
                    .map(|info| PathBuf::from(info.path)),
            };
            match path {
                Some(path) => match session.restore(&path).await {
                    Ok(()) => {
                        println!("[LOADED] Project loaded from {}", path.display());
                        println!(
                            "[STATUS] {} at stage {}",
                            session.config().project_name,
                            session.stage().name()
                        );
                    }
                    Err(e) => println!("[ERROR] Load failed: {e}"),
                },
                None => println!("[ERROR] No save to load in {SAVE_DIR}/"),
            }
        }
        Some("saves") => {
            let dir = parts.get(1).copied().unwrap_or(SAVE_DIR);
            match persist::list_saves(dir).await {
                Ok(saves) if saves.is_empty() => println!("[SAVES] No save files in {dir}"),
                Ok(saves) => {
                    println!("[SAVES]");
                    for save in saves {
                        println!(
                            "  {} - {} ({}, stage {})",
                            save.path,
                            save.metadata.project_name,
                            save.metadata.genre,
                            save.metadata.stage
                        );
                    }
                }
                Err(e) => println!("[ERROR] List failed: {e}"),
            }
        }
        Some("status") => {
            println!("[STATUS]");
            println!(
                "  Project: {} ({}, {})",
                session.config().project_name,
                session.config().genre.name(),
                session.config().tone.name()
            );
            println!("  Style: {}", session.config().style);
            println!("  Stage: {}", session.stage().name());
            println!("  Backend: {}", session.backend_name());
            if session.draft_is_stale() {
                println!("  Draft: STALE (card edited since drafting)");
            }
        }
        Some("bible") => {
            println!("[BIBLE]");
            println!("  {}", session.bible().summary());
            for character in session.bible().characters() {
                println!("  - {}: {}", character.name, character.description);
            }
        }
        Some("reset") => {
            session.reset();
            println!("[RESET] All slots cleared");
        }
        Some("genre") => match parts.get(1).and_then(|s| Genre::parse(s)) {
            Some(genre) => {
                session.config_mut().genre = genre;
                println!("[CONFIG] Genre: {}", genre.name());
            }
            None => println!("[ERROR] Usage: #genre <techno-thriller|cyberpunk|fantasy|romance>"),
        },
        Some("tone") => match parts.get(1).and_then(|s| Tone::parse(s)) {
            Some(tone) => {
                session.config_mut().tone = tone;
                println!("[CONFIG] Tone: {}", tone.name());
            }
            None => println!("[ERROR] Usage: #tone <light|balanced|gritty|dark>"),
        },
        Some("style") => {
            let style = command.trim_start_matches("style").trim();
            if style.is_empty() {
                println!("[ERROR] Usage: #style <author style directive>");
            } else {
                session.config_mut().style = style.to_string();
                println!("[CONFIG] Style: {style}");
            }
        }
        Some("help") => print_help(),
        _ => {
            println!("[ERROR] Unknown command. Type #help for help.");
        }
    }

    true
}

fn print_help() {
    println!("Commands:");
    println!("  #draft          - Write a draft from the scene card");
    println!("  #critique       - Critique the draft and update the bible");
    println!("  #card <json>    - Replace the scene card");
    println!("  #save [path]    - Save the project (timestamped file by default)");
    println!("  #load [path]    - Load a saved project (latest if no path)");
    println!("  #saves [dir]    - List save files");
    println!("  #status         - Show project status");
    println!("  #bible          - Show the story bible");
    println!("  #reset          - Clear all slots and the bible");
    println!("  #genre/#tone/#style <value> - Change settings");
    println!("  #help           - Show this help");
    println!("  #quit           - Exit");
    println!("  (anything else is a chapter premise)");
}
