//! Background worker that owns the studio session.
//!
//! The render loop never blocks on the API: it sends `WorkerRequest`s over a
//! bounded channel and drains `WorkerResponse`s each frame. The worker owns
//! the `StudioSession` and runs one request at a time.

use std::path::PathBuf;

use studio_core::persist;
use studio_core::{Genre, StudioSession, Tone};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Directory for project save files.
pub const SAVE_DIR: &str = "saves";

/// Requests from the UI to the worker.
#[derive(Debug)]
pub enum WorkerRequest {
    /// Generate a scene card from a chapter premise.
    GenerateOutline(String),
    /// Replace the scene card with human-edited text.
    SetSceneCard(String),
    /// Write a draft from the current scene card, streaming deltas.
    WriteDraft,
    /// Critique the current draft and update the story bible.
    RunCritique,
    /// Save the session to a file.
    Save(PathBuf),
    /// Load the session from a file, or from the most recent save if `None`.
    Load(Option<PathBuf>),
    /// List save files in a directory.
    ListSaves(PathBuf),
    /// Clear all pipeline slots and the bible.
    Reset,
    /// Change the project genre.
    SetGenre(Genre),
    /// Change the project tone.
    SetTone(Tone),
    /// Change the author style directive.
    SetStyle(String),
}

/// Responses from the worker to the UI.
#[derive(Debug)]
pub enum WorkerResponse {
    /// Fresh session state for rendering.
    Snapshot(SessionSnapshot),
    /// A streamed chunk of draft text.
    DraftDelta(String),
    /// A status line message.
    Status(String),
    /// An operation failed.
    Error(String),
}

/// A render-ready copy of the session state.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub project_name: String,
    pub genre: String,
    pub tone: String,
    pub style: String,
    pub backend: &'static str,
    pub stage: &'static str,
    pub premise: String,
    pub scene_card: String,
    pub draft: String,
    pub report: String,
    pub draft_stale: bool,
    pub bible_summary: String,
    pub characters: Vec<(String, String)>,
}

impl SessionSnapshot {
    fn of(session: &StudioSession) -> Self {
        Self {
            project_name: session.config().project_name.clone(),
            genre: session.config().genre.name().to_string(),
            tone: session.config().tone.name().to_string(),
            style: session.config().style.clone(),
            backend: session.backend_name(),
            stage: session.stage().name(),
            premise: session.premise().to_string(),
            scene_card: session.scene_card().to_string(),
            draft: session.draft().to_string(),
            report: session.report().to_string(),
            draft_stale: session.draft_is_stale(),
            bible_summary: session.bible().summary().to_string(),
            characters: session
                .bible()
                .characters()
                .map(|c| (c.name.clone(), c.description.clone()))
                .collect(),
        }
    }
}

/// Take a snapshot of a session for the initial render.
pub fn snapshot(session: &StudioSession) -> SessionSnapshot {
    SessionSnapshot::of(session)
}

/// Run the worker until the request channel closes.
pub async fn run(
    mut session: StudioSession,
    mut request_rx: mpsc::Receiver<WorkerRequest>,
    response_tx: mpsc::UnboundedSender<WorkerResponse>,
) {
    while let Some(request) = request_rx.recv().await {
        handle_request(&mut session, request, &response_tx).await;
        // Every request ends with a fresh snapshot
        let _ = response_tx.send(WorkerResponse::Snapshot(SessionSnapshot::of(&session)));
    }
    info!("worker shutting down");
}

async fn handle_request(
    session: &mut StudioSession,
    request: WorkerRequest,
    response_tx: &mpsc::UnboundedSender<WorkerResponse>,
) {
    match request {
        WorkerRequest::GenerateOutline(premise) => {
            match session.generate_outline(&premise).await {
                Ok(_) => send_status(response_tx, "Scene card ready. Press 'e' to edit it."),
                Err(e) => send_error(response_tx, e.to_string()),
            }
        }
        WorkerRequest::SetSceneCard(text) => {
            session.set_scene_card(text);
            send_status(response_tx, "Scene card updated");
        }
        WorkerRequest::WriteDraft => {
            let tx = response_tx.clone();
            let mut on_delta = move |chunk: &str| {
                let _ = tx.send(WorkerResponse::DraftDelta(chunk.to_string()));
            };
            match session.write_draft_stream(&mut on_delta).await {
                Ok(_) => send_status(response_tx, "Draft complete"),
                Err(e) => send_error(response_tx, e.to_string()),
            }
        }
        WorkerRequest::RunCritique => match session.run_critique().await {
            Ok(_) => {
                // Checkpoint the finished chapter; a failed write is not fatal
                let checkpoint =
                    persist::auto_save_path(SAVE_DIR, &session.config().project_name);
                match session.save(&checkpoint).await {
                    Ok(()) => send_status(
                        response_tx,
                        "Editorial report ready, bible updated (checkpoint saved)",
                    ),
                    Err(e) => {
                        warn!(%e, "checkpoint save failed");
                        send_status(response_tx, "Editorial report ready, bible updated");
                    }
                }
            }
            Err(e) => send_error(response_tx, e.to_string()),
        },
        WorkerRequest::Save(path) => match session.save(&path).await {
            Ok(()) => send_status(response_tx, format!("Saved to {}", path.display())),
            Err(e) => send_error(response_tx, format!("Save failed: {e}")),
        },
        WorkerRequest::Load(path) => {
            let path = match path {
                Some(path) => Some(path),
                None => match persist::latest_save(SAVE_DIR).await {
                    Ok(info) => info.map(|i| PathBuf::from(i.path)),
                    Err(e) => {
                        send_error(response_tx, format!("Load failed: {e}"));
                        return;
                    }
                },
            };
            let Some(path) = path else {
                send_error(response_tx, format!("No save files in {SAVE_DIR}/"));
                return;
            };
            match session.restore(&path).await {
                Ok(()) => send_status(response_tx, format!("Loaded from {}", path.display())),
                Err(e) => send_error(response_tx, format!("Load failed: {e}")),
            }
        }
        WorkerRequest::ListSaves(dir) => match persist::list_saves(&dir).await {
            Ok(saves) if saves.is_empty() => {
                send_status(response_tx, format!("No save files in {}", dir.display()))
            }
            Ok(saves) => {
                let listing: Vec<String> = saves
                    .iter()
                    .map(|s| {
                        format!(
                            "{} [{} / {}]",
                            s.metadata.project_name, s.metadata.genre, s.metadata.stage
                        )
                    })
                    .collect();
                send_status(response_tx, format!("Saves: {}", listing.join(", ")));
            }
            Err(e) => send_error(response_tx, format!("List failed: {e}")),
        },
        WorkerRequest::Reset => {
            session.reset();
            send_status(response_tx, "Project reset");
        }
        WorkerRequest::SetGenre(genre) => {
            session.config_mut().genre = genre;
            send_status(response_tx, format!("Genre: {}", genre.name()));
        }
        WorkerRequest::SetTone(tone) => {
            session.config_mut().tone = tone;
            send_status(response_tx, format!("Tone: {}", tone.name()));
        }
        WorkerRequest::SetStyle(style) => {
            send_status(response_tx, format!("Style: {style}"));
            session.config_mut().style = style;
        }
    }
}

fn send_status(tx: &mpsc::UnboundedSender<WorkerResponse>, message: impl Into<String>) {
    let _ = tx.send(WorkerResponse::Status(message.into()));
}

fn send_error(tx: &mpsc::UnboundedSender<WorkerResponse>, message: impl Into<String>) {
    let message = message.into();
    error!(%message, "worker request failed");
    let _ = tx.send(WorkerResponse::Error(message));
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_core::{MockNovelist, NovelistBackend, StudioConfig};

    fn instant_session(name: &str) -> StudioSession {
        StudioSession::with_backend(
            StudioConfig::new(name),
            NovelistBackend::Mock(MockNovelist::instant()),
        )
    }

    #[tokio::test]
    async fn test_save_list_and_load_round_trip() {
        let temp = tempfile::TempDir::new().expect("Failed to create temp dir");
        let save_path = temp.path().join("neon.json");

        let (request_tx, request_rx) = mpsc::channel(8);
        let (response_tx, mut response_rx) = mpsc::unbounded_channel();
        tokio::spawn(run(instant_session("Neon Rain"), request_rx, response_tx));

        request_tx
            .send(WorkerRequest::Save(save_path.clone()))
            .await
            .expect("Send should succeed");
        request_tx
            .send(WorkerRequest::ListSaves(temp.path().to_path_buf()))
            .await
            .expect("Send should succeed");
        drop(request_tx);

        let mut statuses = Vec::new();
        let mut errors = Vec::new();
        while let Some(response) = response_rx.recv().await {
            match response {
                WorkerResponse::Status(s) => statuses.push(s),
                WorkerResponse::Error(e) => errors.push(e),
                _ => {}
            }
        }
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        assert!(statuses.iter().any(|s| s.starts_with("Saved to")));
        assert!(statuses.iter().any(|s| s.contains("Neon Rain")));

        // A fresh worker restores the saved project by path
        let (request_tx, request_rx) = mpsc::channel(8);
        let (response_tx, mut response_rx) = mpsc::unbounded_channel();
        tokio::spawn(run(instant_session("Untitled"), request_rx, response_tx));
        request_tx
            .send(WorkerRequest::Load(Some(save_path)))
            .await
            .expect("Send should succeed");
        drop(request_tx);

        let mut last_snapshot = None;
        while let Some(response) = response_rx.recv().await {
            if let WorkerResponse::Snapshot(snapshot) = response {
                last_snapshot = Some(snapshot);
            }
        }
        let snapshot = last_snapshot.expect("A snapshot should follow every request");
        assert_eq!(snapshot.project_name, "Neon Rain");
    }

    #[tokio::test]
    async fn test_list_saves_empty_dir() {
        let temp = tempfile::TempDir::new().expect("Failed to create temp dir");

        let (request_tx, request_rx) = mpsc::channel(8);
        let (response_tx, mut response_rx) = mpsc::unbounded_channel();
        tokio::spawn(run(instant_session("Test"), request_rx, response_tx));

        request_tx
            .send(WorkerRequest::ListSaves(temp.path().to_path_buf()))
            .await
            .expect("Send should succeed");
        drop(request_tx);

        let mut statuses = Vec::new();
        while let Some(response) = response_rx.recv().await {
            if let WorkerResponse::Status(s) = response {
                statuses.push(s);
            }
        }
        assert!(statuses.iter().any(|s| s.starts_with("No save files")));
    }
}
