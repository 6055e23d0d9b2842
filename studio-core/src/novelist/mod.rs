//! Novelist agents: the live API-backed agent and the backend seam.

mod agent;
pub mod prompts;

pub use agent::{Novelist, NovelistError};

use crate::bible::{BibleUpdate, StoryBible};
use crate::config::StudioConfig;
use crate::testing::MockNovelist;

/// The generation backend for a session: live API or mock fixtures.
///
/// The mock backend runs the full pipeline with no API key, simulated
/// latency, and deterministic output; the studio falls back to it when no
/// key is configured.
pub enum NovelistBackend {
    Live(Novelist),
    Mock(MockNovelist),
}

impl NovelistBackend {
    /// Create a live backend from the OPENAI_API_KEY environment variable.
    pub fn from_env() -> Result<Self, NovelistError> {
        Ok(Self::Live(Novelist::from_env()?))
    }

    /// Create a mock backend with prototype latency (2s / 3s / 2s).
    pub fn mock() -> Self {
        Self::Mock(MockNovelist::new())
    }

    /// Whether this backend is the mock.
    pub fn is_mock(&self) -> bool {
        matches!(self, Self::Mock(_))
    }

    /// Short display name for the status line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Live(_) => "live",
            Self::Mock(_) => "mock",
        }
    }

    /// Generate a scene card from a premise.
    pub async fn outline(
        &mut self,
        premise: &str,
        config: &StudioConfig,
        bible: &StoryBible,
    ) -> Result<String, NovelistError> {
        match self {
            Self::Live(agent) => agent.outline(premise, config, bible).await,
            Self::Mock(mock) => Ok(mock.outline(premise, config).await),
        }
    }

    /// Write a draft from a scene card.
    pub async fn draft(
        &mut self,
        card_text: &str,
        config: &StudioConfig,
    ) -> Result<String, NovelistError> {
        match self {
            Self::Live(agent) => agent.draft(card_text, config).await,
            Self::Mock(mock) => Ok(mock.draft(card_text, config).await),
        }
    }

    /// Write a draft, streaming deltas through `on_delta`.
    pub async fn draft_stream(
        &mut self,
        card_text: &str,
        config: &StudioConfig,
        on_delta: &mut (dyn FnMut(&str) + Send),
    ) -> Result<String, NovelistError> {
        match self {
            Self::Live(agent) => agent.draft_stream(card_text, config, on_delta).await,
            Self::Mock(mock) => Ok(mock.draft_stream(card_text, config, on_delta).await),
        }
    }

    /// Produce an editorial report for a draft.
    pub async fn critique(
        &mut self,
        draft: &str,
        config: &StudioConfig,
    ) -> Result<String, NovelistError> {
        match self {
            Self::Live(agent) => agent.critique(draft, config).await,
            Self::Mock(mock) => Ok(mock.critique(draft, config).await),
        }
    }

    /// Ask the archivist for a bible update after a critique.
    pub async fn archive(
        &mut self,
        premise: &str,
        draft: &str,
        config: &StudioConfig,
        bible: &StoryBible,
    ) -> Result<BibleUpdate, NovelistError> {
        match self {
            Self::Live(agent) => agent.archive(premise, draft, config, bible).await,
            Self::Mock(mock) => Ok(mock.archive(premise)),
        }
    }
}
