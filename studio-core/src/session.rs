//! StudioSession - the primary public API for the writing pipeline.
//!
//! This module provides a clean, high-level interface over the four session
//! slots (story bible, scene card, draft, editorial report), the novelist
//! backend, and persistence. The TUI, the headless runner, and the tests
//! all drive the studio through this type.

use crate::bible::StoryBible;
use crate::config::StudioConfig;
use crate::novelist::{NovelistBackend, NovelistError};
use crate::persist::{PersistError, SaveMetadata, SavedStudio, SAVE_VERSION};
use crate::scene::{SceneCard, SceneCardError};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors from studio session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Novelist error: {0}")]
    Novelist(#[from] NovelistError),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("Scene card error: {0}")]
    Scene(#[from] SceneCardError),

    #[error("Cannot {action}: {needed} is empty")]
    MissingInput {
        action: &'static str,
        needed: &'static str,
    },

    #[error("No API key configured - set OPENAI_API_KEY environment variable")]
    NoApiKey,
}

/// The pipeline stage a session has reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing generated yet.
    Premise,
    /// A scene card exists.
    Outline,
    /// A draft exists.
    Draft,
    /// An editorial report exists.
    Critique,
}

impl Stage {
    /// Display name for the stage.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Premise => "Premise",
            Stage::Outline => "Outline",
            Stage::Draft => "Draft",
            Stage::Critique => "Critique",
        }
    }
}

/// A writing session.
///
/// This is the main entry point for the pipeline. It manages:
/// - The four session slots and their lifecycle
/// - The novelist backend (live or mock)
/// - Session persistence
pub struct StudioSession {
    config: StudioConfig,
    backend: NovelistBackend,
    bible: StoryBible,
    premise: String,
    scene_card: String,
    draft: String,
    report: String,
    /// The scene card text the current draft was generated from.
    drafted_card: Option<String>,
}

impl StudioSession {
    /// Create a new session with a live backend.
    ///
    /// Requires `OPENAI_API_KEY` environment variable to be set.
    pub fn new(config: StudioConfig) -> Result<Self, SessionError> {
        let backend = NovelistBackend::from_env().map_err(|_| SessionError::NoApiKey)?;
        Ok(Self::with_backend(config, backend))
    }

    /// Create a session with an explicit backend (mock or live).
    pub fn with_backend(config: StudioConfig, backend: NovelistBackend) -> Self {
        Self {
            config,
            backend,
            bible: StoryBible::new(),
            premise: String::new(),
            scene_card: String::new(),
            draft: String::new(),
            report: String::new(),
            drafted_card: None,
        }
    }

    /// Generate a scene card from a chapter premise.
    ///
    /// Stores the premise and overwrites the scene card slot. The draft and
    /// report slots are left untouched; a surviving draft becomes stale.
    pub async fn generate_outline(&mut self, premise: &str) -> Result<&str, SessionError> {
        let premise = premise.trim();
        if premise.is_empty() {
            return Err(SessionError::MissingInput {
                action: "generate an outline",
                needed: "premise",
            });
        }

        self.premise = premise.to_string();
        self.scene_card = self
            .backend
            .outline(premise, &self.config, &self.bible)
            .await?;

        Ok(&self.scene_card)
    }

    /// Replace the scene card with human-edited text.
    pub fn set_scene_card(&mut self, text: impl Into<String>) {
        self.scene_card = text.into();
    }

    /// Write a chapter draft from the current scene card.
    ///
    /// The card must parse as a valid scene card; the raw (possibly edited)
    /// text is what the writer sees.
    pub async fn write_draft(&mut self) -> Result<&str, SessionError> {
        self.check_card_for_draft()?;

        self.draft = self.backend.draft(&self.scene_card, &self.config).await?;
        self.drafted_card = Some(self.scene_card.clone());

        Ok(&self.draft)
    }

    /// Write a chapter draft, streaming deltas through `on_delta`.
    pub async fn write_draft_stream(
        &mut self,
        on_delta: &mut (dyn FnMut(&str) + Send),
    ) -> Result<&str, SessionError> {
        self.check_card_for_draft()?;

        self.draft = self
            .backend
            .draft_stream(&self.scene_card, &self.config, on_delta)
            .await?;
        self.drafted_card = Some(self.scene_card.clone());

        Ok(&self.draft)
    }

    /// Produce an editorial report for the current draft, then run the
    /// archivist to fold the chapter into the story bible.
    pub async fn run_critique(&mut self) -> Result<&str, SessionError> {
        if self.draft.is_empty() {
            return Err(SessionError::MissingInput {
                action: "run a critique",
                needed: "draft",
            });
        }

        self.report = self.backend.critique(&self.draft, &self.config).await?;

        let update = self
            .backend
            .archive(&self.premise, &self.draft, &self.config, &self.bible)
            .await?;
        self.bible.apply(&update);

        Ok(&self.report)
    }

    /// Erase all four session slots together and reset the bible.
    pub fn reset(&mut self) {
        self.bible = StoryBible::new();
        self.premise.clear();
        self.scene_card.clear();
        self.draft.clear();
        self.report.clear();
        self.drafted_card = None;
        info!("session reset");
    }

    /// Whether the draft was generated from a different scene card than the
    /// one currently in the slot.
    pub fn draft_is_stale(&self) -> bool {
        !self.draft.is_empty() && self.drafted_card.as_deref() != Some(self.scene_card.as_str())
    }

    /// The furthest pipeline stage reached.
    pub fn stage(&self) -> Stage {
        if !self.report.is_empty() {
            Stage::Critique
        } else if !self.draft.is_empty() {
            Stage::Draft
        } else if !self.scene_card.is_empty() {
            Stage::Outline
        } else {
            Stage::Premise
        }
    }

    /// Save the current session to a file.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let saved = SavedStudio {
            version: SAVE_VERSION,
            saved_at: crate::persist::timestamp(),
            config: self.config.clone(),
            bible: self.bible.clone(),
            premise: self.premise.clone(),
            scene_card: self.scene_card.clone(),
            draft: self.draft.clone(),
            report: self.report.clone(),
            drafted_card: self.drafted_card.clone(),
            metadata: SaveMetadata {
                project_name: self.config.project_name.clone(),
                genre: self.config.genre.name().to_string(),
                stage: self.stage().name().to_string(),
                character_count: self.bible.character_count(),
                saved_at: crate::persist::timestamp(),
            },
        };

        saved.save_json(&path).await?;
        info!(path = %path.as_ref().display(), "session saved");
        Ok(())
    }

    /// Restore session state from a save file, keeping the current backend.
    pub async fn restore(&mut self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let saved = SavedStudio::load_json(&path).await?;

        self.config = saved.config;
        self.bible = saved.bible;
        self.premise = saved.premise;
        self.scene_card = saved.scene_card;
        self.draft = saved.draft;
        self.report = saved.report;
        self.drafted_card = saved.drafted_card;

        info!(path = %path.as_ref().display(), "session restored");
        Ok(())
    }

    fn check_card_for_draft(&self) -> Result<(), SessionError> {
        if self.scene_card.is_empty() {
            return Err(SessionError::MissingInput {
                action: "write a draft",
                needed: "scene card",
            });
        }
        // The user may have broken the JSON while editing
        SceneCard::parse(&self.scene_card)?;
        Ok(())
    }

    /// Get the session configuration.
    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    /// Get mutable access to the configuration.
    ///
    /// Changes apply to the next generation call.
    pub fn config_mut(&mut self) -> &mut StudioConfig {
        &mut self.config
    }

    /// Get the story bible.
    pub fn bible(&self) -> &StoryBible {
        &self.bible
    }

    /// Short name of the active backend ("live" or "mock").
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Whether the session runs on the mock backend.
    pub fn is_mock(&self) -> bool {
        self.backend.is_mock()
    }

    /// The stored chapter premise.
    pub fn premise(&self) -> &str {
        &self.premise
    }

    /// The scene card text (possibly human-edited).
    pub fn scene_card(&self) -> &str {
        &self.scene_card
    }

    /// The chapter draft.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// The editorial report.
    pub fn report(&self) -> &str {
        &self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::novelist::NovelistBackend;
    use crate::testing::MockNovelist;

    fn mock_session() -> StudioSession {
        StudioSession::with_backend(
            StudioConfig::new("Test Project"),
            NovelistBackend::Mock(MockNovelist::instant()),
        )
    }

    #[tokio::test]
    async fn test_outline_requires_premise() {
        let mut session = mock_session();
        let err = session.generate_outline("   ").await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::MissingInput { needed: "premise", .. }
        ));
    }

    #[tokio::test]
    async fn test_draft_requires_card() {
        let mut session = mock_session();
        let err = session.write_draft().await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::MissingInput { needed: "scene card", .. }
        ));
    }

    #[tokio::test]
    async fn test_critique_requires_draft() {
        let mut session = mock_session();
        let err = session.run_critique().await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::MissingInput { needed: "draft", .. }
        ));
    }

    #[tokio::test]
    async fn test_draft_rejects_broken_card_edit() {
        let mut session = mock_session();
        session.generate_outline("A heist goes wrong").await.unwrap();

        session.set_scene_card("{ not json any more");
        let err = session.write_draft().await.unwrap_err();
        assert!(matches!(err, SessionError::Scene(_)));
    }

    #[tokio::test]
    async fn test_stage_progression() {
        let mut session = mock_session();
        assert_eq!(session.stage(), Stage::Premise);

        session.generate_outline("A heist goes wrong").await.unwrap();
        assert_eq!(session.stage(), Stage::Outline);

        session.write_draft().await.unwrap();
        assert_eq!(session.stage(), Stage::Draft);

        session.run_critique().await.unwrap();
        assert_eq!(session.stage(), Stage::Critique);
    }

    #[tokio::test]
    async fn test_draft_staleness_tracks_card_edits() {
        let mut session = mock_session();
        session.generate_outline("A heist goes wrong").await.unwrap();
        session.write_draft().await.unwrap();
        assert!(!session.draft_is_stale());

        let edited = session.scene_card().replace("Cliffhanger", "Quiet");
        session.set_scene_card(edited);
        assert!(session.draft_is_stale());

        session.write_draft().await.unwrap();
        assert!(!session.draft_is_stale());
    }

    #[tokio::test]
    async fn test_reset_clears_everything_together() {
        let mut session = mock_session();
        session.generate_outline("A heist goes wrong").await.unwrap();
        session.write_draft().await.unwrap();
        session.run_critique().await.unwrap();

        session.reset();

        assert_eq!(session.stage(), Stage::Premise);
        assert!(session.premise().is_empty());
        assert!(session.scene_card().is_empty());
        assert!(session.draft().is_empty());
        assert!(session.report().is_empty());
        assert_eq!(session.bible().summary(), "Start of the story.");
    }

    #[tokio::test]
    async fn test_critique_updates_bible() {
        let mut session = mock_session();
        session.generate_outline("Jinx hacks the mainframe").await.unwrap();
        session.write_draft().await.unwrap();
        session.run_critique().await.unwrap();

        assert!(session
            .bible()
            .summary()
            .contains("Processed premise: Jinx hacks the mainframe"));
    }

    #[tokio::test]
    async fn test_outline_overwrites_previous_card() {
        let mut session = mock_session();
        session.generate_outline("First premise").await.unwrap();
        let first = session.scene_card().to_string();

        session.generate_outline("Second premise").await.unwrap();
        assert_ne!(session.scene_card(), first);
        assert!(session.scene_card().contains("Second premise"));
    }
}
