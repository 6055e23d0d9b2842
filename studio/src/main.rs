//! AI Novelist Studio TUI application.
//!
//! A vim-style terminal interface for drafting a novel chapter by chapter
//! with AI agents: premise -> scene card -> draft -> editorial critique.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-oriented interface suitable for
//! automated testing:
//!
//! ```bash
//! cargo run -p studio -- --headless --mock --project "Neon Rain"
//! ```

mod app;
mod events;
mod headless;
mod ui;
mod worker;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::time::Duration;
use studio_core::{Genre, NovelistBackend, StudioConfig, StudioSession, Tone};
use tokio::sync::mpsc;
use tracing::info;

use app::App;
use events::{handle_event, EventResult};
use ui::render::render;

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let logs_dir = std::path::Path::new("logs");
    std::fs::create_dir_all(logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(logs_dir, "studio.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,studio=debug,studio_core=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let _log_guard = init_logging();

    let config = parse_config_from_args(&args);
    let force_mock = args.iter().any(|a| a == "--mock");

    // Pick the backend: live when a key is available, mock otherwise
    let (backend, fell_back) = if force_mock {
        (NovelistBackend::mock(), false)
    } else {
        match NovelistBackend::from_env() {
            Ok(backend) => (backend, false),
            Err(_) => (NovelistBackend::mock(), true),
        }
    };

    if fell_back {
        eprintln!("OPENAI_API_KEY not set: running with the mock backend.");
        eprintln!("Set the key in .env or the environment for live generation.");
    }
    info!(backend = backend.name(), project = %config.project_name, "studio starting");

    let session = StudioSession::with_backend(config, backend);

    // Headless mode drives the session directly
    if args.iter().any(|a| a == "--headless") {
        return headless::run_headless(session).await.map_err(|e| e.into());
    }

    // Worker channels: bounded requests, unbounded responses
    let (request_tx, request_rx) = mpsc::channel(8);
    let (response_tx, response_rx) = mpsc::unbounded_channel();

    let snapshot = worker::snapshot(&session);
    tokio::spawn(worker::run(session, request_rx, response_tx));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, App::new(request_tx, response_rx, snapshot)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    loop {
        app.drain_responses();

        terminal.draw(|f| render(f, &app))?;

        // Poll for events with a timeout so worker responses keep flowing
        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            match handle_event(&mut app, ev) {
                EventResult::Quit => return Ok(()),
                EventResult::NeedsRedraw | EventResult::Continue => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Parse project configuration from command line arguments.
fn parse_config_from_args(args: &[String]) -> StudioConfig {
    let mut config = StudioConfig::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--project" => {
                if let Some(name) = args.get(i + 1) {
                    config.project_name = name.clone();
                    i += 1;
                }
            }
            "--genre" => {
                if let Some(genre) = args.get(i + 1) {
                    config.genre = Genre::parse(genre).unwrap_or_default();
                    i += 1;
                }
            }
            "--tone" => {
                if let Some(tone) = args.get(i + 1) {
                    config.tone = Tone::parse(tone).unwrap_or_default();
                    i += 1;
                }
            }
            "--style" => {
                if let Some(style) = args.get(i + 1) {
                    config.style = style.clone();
                    i += 1;
                }
            }
            "--model" => {
                if let Some(model) = args.get(i + 1) {
                    config.model = Some(model.clone());
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }

    config
}

fn print_help() {
    println!("AI Novelist Studio - chapter drafting with AI agents");
    println!();
    println!("USAGE:");
    println!("  studio [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help          Show this help message");
    println!("  --headless          Run in headless mode (text-only, no TUI)");
    println!("  --mock              Use the mock backend (no API key needed)");
    println!("  --project <NAME>    Project name (default: Untitled Project)");
    println!("  --genre <GENRE>     Story genre (default: techno-thriller)");
    println!("  --tone <TONE>       Tone (default: balanced)");
    println!("  --style <STYLE>     Author style directive");
    println!("  --model <MODEL>     Override the generation model");
    println!();
    println!("GENRES:");
    println!("  techno-thriller, cyberpunk, high-fantasy, romance");
    println!();
    println!("TONES:");
    println!("  light, balanced, gritty, dark");
    println!();
    println!("EXAMPLES:");
    println!("  studio                                  # Interactive TUI mode");
    println!("  studio --mock                           # TUI with fixture generators");
    println!("  studio --headless --project \"Neon Rain\" --genre cyberpunk");
}
