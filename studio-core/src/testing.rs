//! Testing utilities for the studio.
//!
//! This module provides:
//! - `MockNovelist` for deterministic pipeline runs without API calls
//! - `TestHarness` for scripted studio scenarios
//! - Assertion helpers for verifying session state
//!
//! The mock is also the studio's no-key fallback backend: it simulates the
//! latency of each stage and returns fixed strings templated on its inputs,
//! matching the prototype's placeholder generators.

use crate::bible::BibleUpdate;
use crate::config::StudioConfig;
use crate::novelist::NovelistBackend;
use crate::scene::SceneCard;
use crate::session::{SessionError, Stage, StudioSession};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::sleep;

/// Simulated latency per stage.
#[derive(Debug, Clone, Copy)]
pub struct MockLatency {
    pub outline: Duration,
    pub draft: Duration,
    pub critique: Duration,
}

impl MockLatency {
    /// The prototype's delays: outline 2s, draft 3s, critique 2s.
    pub fn prototype() -> Self {
        Self {
            outline: Duration::from_secs(2),
            draft: Duration::from_secs(3),
            critique: Duration::from_secs(2),
        }
    }

    /// No delay at all, for tests.
    pub fn instant() -> Self {
        Self {
            outline: Duration::ZERO,
            draft: Duration::ZERO,
            critique: Duration::ZERO,
        }
    }
}

/// A mock novelist that returns deterministic fixtures.
///
/// Scripted responses, when queued, take priority over the templated
/// fixtures and are consumed in order per stage.
pub struct MockNovelist {
    latency: MockLatency,
    scripted_outlines: VecDeque<String>,
    scripted_drafts: VecDeque<String>,
    scripted_critiques: VecDeque<String>,
}

impl MockNovelist {
    /// Create a mock with prototype latency.
    pub fn new() -> Self {
        Self::with_latency(MockLatency::prototype())
    }

    /// Create a mock with no latency, for tests.
    pub fn instant() -> Self {
        Self::with_latency(MockLatency::instant())
    }

    /// Create a mock with specific latency.
    pub fn with_latency(latency: MockLatency) -> Self {
        Self {
            latency,
            scripted_outlines: VecDeque::new(),
            scripted_drafts: VecDeque::new(),
            scripted_critiques: VecDeque::new(),
        }
    }

    /// Queue a scripted outline (returned before templated fixtures).
    pub fn queue_outline(&mut self, text: impl Into<String>) {
        self.scripted_outlines.push_back(text.into());
    }

    /// Queue a scripted draft.
    pub fn queue_draft(&mut self, text: impl Into<String>) {
        self.scripted_drafts.push_back(text.into());
    }

    /// Queue a scripted critique.
    pub fn queue_critique(&mut self, text: impl Into<String>) {
        self.scripted_critiques.push_back(text.into());
    }

    /// Generate a mock scene card.
    pub async fn outline(&mut self, premise: &str, config: &StudioConfig) -> String {
        sleep(self.latency.outline).await;

        if let Some(scripted) = self.scripted_outlines.pop_front() {
            return scripted;
        }

        SceneCard {
            title: format!("Mock Outline for {}", config.genre.name()),
            beats: vec![
                format!("1. {premise} (The Setup)"),
                "2. The protagonist faces a glitch in the system.".to_string(),
                "3. A sudden betrayal occurs.".to_string(),
                "4. Cliffhanger ending.".to_string(),
            ],
        }
        .to_text()
    }

    /// Generate a mock draft.
    pub async fn draft(&mut self, card_text: &str, config: &StudioConfig) -> String {
        sleep(self.latency.draft).await;

        if let Some(scripted) = self.scripted_drafts.pop_front() {
            return scripted;
        }

        mock_draft(card_text, &config.style)
    }

    /// Generate a mock draft, emitting it through `on_delta` word by word.
    pub async fn draft_stream(
        &mut self,
        card_text: &str,
        config: &StudioConfig,
        on_delta: &mut (dyn FnMut(&str) + Send),
    ) -> String {
        let draft = self.draft(card_text, config).await;
        for chunk in draft.split_inclusive(' ') {
            on_delta(chunk);
        }
        draft
    }

    /// Generate a mock editorial report.
    pub async fn critique(&mut self, _draft: &str, config: &StudioConfig) -> String {
        sleep(self.latency.critique).await;

        if let Some(scripted) = self.scripted_critiques.pop_front() {
            return scripted;
        }

        format!(
            "# Editorial Report\n\
             * **Genre Compliance:** {} conventions are met.\n\
             * **Pacing:** Good, but the middle section drags.\n\
             * **Logic Check:** Why did the console buzz? Servers are usually silent.\n",
            config.genre.name()
        )
    }

    /// The mock archivist update: records that the premise was processed.
    pub fn archive(&mut self, premise: &str) -> BibleUpdate {
        BibleUpdate {
            summary_addendum: format!("Processed premise: {premise}"),
            characters: Vec::new(),
        }
    }
}

impl Default for MockNovelist {
    fn default() -> Self {
        Self::new()
    }
}

fn mock_draft(card_text: &str, style: &str) -> String {
    format!(
        "The neon lights of the server room hummed with a headache-inducing buzz.\n\
         This was the style of {style}. Short and punchy.\n\n\
         \"System breach,\" the console read.\n\n\
         He didn't panic. He never panicked. He just typed faster, his fingers \
         blurring like hummingbirds against the mechanical keys.\n\
         (This is a mock draft generated based on: {card_text})"
    )
}

/// Test harness for running studio scenarios against the mock backend.
pub struct TestHarness {
    /// The studio session under test.
    pub session: StudioSession,
}

impl TestHarness {
    /// Create a harness with a default config and an instant mock backend.
    pub fn new() -> Self {
        Self::with_config(StudioConfig::new("Test Project"))
    }

    /// Create a harness with a custom config.
    pub fn with_config(config: StudioConfig) -> Self {
        let backend = NovelistBackend::Mock(MockNovelist::instant());
        Self {
            session: StudioSession::with_backend(config, backend),
        }
    }

    /// Create a harness around a preconfigured mock.
    pub fn with_mock(mock: MockNovelist) -> Self {
        Self {
            session: StudioSession::with_backend(
                StudioConfig::new("Test Project"),
                NovelistBackend::Mock(mock),
            ),
        }
    }

    /// Run the full premise-to-report pipeline.
    pub async fn run_pipeline(&mut self, premise: &str) -> Result<(), SessionError> {
        self.session.generate_outline(premise).await?;
        self.session.write_draft().await?;
        self.session.run_critique().await?;
        Ok(())
    }

    /// Current pipeline stage.
    pub fn stage(&self) -> Stage {
        self.session.stage()
    }

    /// Whether the bible tracks a character by name.
    pub fn has_character(&self, name: &str) -> bool {
        self.session.bible().find_character(name).is_some()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the session is at the expected pipeline stage.
#[track_caller]
pub fn assert_stage(harness: &TestHarness, expected: Stage) {
    let actual = harness.stage();
    assert_eq!(actual, expected, "Expected stage {expected:?}, got {actual:?}");
}

/// Assert the bible tracks a character with the given name.
#[track_caller]
pub fn assert_has_character(harness: &TestHarness, name: &str) {
    assert!(
        harness.has_character(name),
        "Expected character '{name}' to exist in the story bible"
    );
}

/// Assert the bible summary mentions the given text.
#[track_caller]
pub fn assert_summary_mentions(harness: &TestHarness, text: &str) {
    let summary = harness.session.bible().summary();
    assert!(
        summary.contains(text),
        "Expected bible summary to mention '{text}', got: {summary}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_outline_is_valid_scene_card() {
        let mut mock = MockNovelist::instant();
        let config = StudioConfig::new("Test");
        let text = mock.outline("Jinx hacks the mainframe", &config).await;

        let card = SceneCard::parse(&text).unwrap();
        assert!(card.title.starts_with("Mock Outline for"));
        assert!(card.beats[0].contains("Jinx hacks the mainframe"));
        assert_eq!(card.beats.len(), 4);
    }

    #[tokio::test]
    async fn test_mock_draft_names_style_and_card() {
        let mut mock = MockNovelist::instant();
        let config = StudioConfig::new("Test").with_style("telegraphic prose");
        let draft = mock.draft("the card", &config).await;

        assert!(draft.contains("telegraphic prose"));
        assert!(draft.contains("mock draft generated based on: the card"));
    }

    #[tokio::test]
    async fn test_mock_critique_names_genre() {
        let mut mock = MockNovelist::instant();
        let config = StudioConfig::new("Test").with_genre(crate::config::Genre::Romance);
        let report = mock.critique("a draft", &config).await;

        assert!(report.starts_with("# Editorial Report"));
        assert!(report.contains("Romance conventions are met"));
    }

    #[tokio::test]
    async fn test_scripted_responses_take_priority() {
        let mut mock = MockNovelist::instant();
        mock.queue_draft("scripted draft one");

        let config = StudioConfig::new("Test");
        assert_eq!(mock.draft("card", &config).await, "scripted draft one");

        // Queue exhausted, back to the template
        assert!(mock.draft("card", &config).await.contains("neon lights"));
    }

    #[tokio::test]
    async fn test_mock_draft_stream_reassembles() {
        let mut mock = MockNovelist::instant();
        let config = StudioConfig::new("Test");

        let mut streamed = String::new();
        let draft = mock
            .draft_stream("card", &config, &mut |chunk: &str| streamed.push_str(chunk))
            .await;

        assert_eq!(streamed, draft);
    }

    #[test]
    fn test_mock_archive_records_premise() {
        let mut mock = MockNovelist::instant();
        let update = mock.archive("Jinx hacks the mainframe");
        assert_eq!(
            update.summary_addendum,
            "Processed premise: Jinx hacks the mainframe"
        );
        assert!(update.characters.is_empty());
    }
}
