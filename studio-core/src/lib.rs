//! Novel-writing engine with AI novelist agents.
//!
//! This crate provides:
//! - The premise -> outline -> draft -> critique chapter pipeline
//! - AI novelist agents backed by the OpenAI API, with a deterministic mock
//! - A story bible that accumulates continuity across chapters
//! - Project persistence
//!
//! # Quick Start
//!
//! ```ignore
//! use studio_core::{StudioConfig, StudioSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StudioConfig::new("Neon Rain");
//!     let mut session = StudioSession::new(config)?;
//!
//!     session.generate_outline("Jinx hacks the mainframe").await?;
//!     session.write_draft().await?;
//!     let report = session.run_critique().await?;
//!     println!("{report}");
//!
//!     session.save("neon_rain.json").await?;
//!     Ok(())
//! }
//! ```

pub mod bible;
pub mod config;
pub mod novelist;
pub mod persist;
pub mod scene;
pub mod session;
pub mod testing;

// Primary public API
pub use bible::{BibleUpdate, Character, CharacterId, CharacterSketch, StoryBible};
pub use config::{Genre, StudioConfig, Tone};
pub use novelist::{Novelist, NovelistBackend, NovelistError};
pub use scene::{SceneCard, SceneCardError};
pub use session::{SessionError, Stage, StudioSession};
pub use testing::{MockLatency, MockNovelist, TestHarness};
