//! Project persistence for save/load functionality.
//!
//! Serializes the whole writing session (config, bible, and the four
//! pipeline slots) as versioned, human-readable JSON.

use crate::bible::StoryBible;
use crate::config::StudioConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current save file version.
pub const SAVE_VERSION: u32 = 1;

/// A saved project with all state needed to resume writing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedStudio {
    /// Save format version for compatibility checking.
    pub version: u32,

    /// When the save was created.
    pub saved_at: String,

    /// The project configuration.
    pub config: StudioConfig,

    /// The story bible.
    pub bible: StoryBible,

    /// The chapter premise.
    pub premise: String,

    /// The scene card text, possibly human-edited.
    pub scene_card: String,

    /// The chapter draft.
    pub draft: String,

    /// The editorial report.
    pub report: String,

    /// The scene card the draft was generated from, for staleness detection.
    pub drafted_card: Option<String>,

    /// Metadata about the save.
    pub metadata: SaveMetadata,
}

/// Metadata about the save file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveMetadata {
    /// Project name.
    pub project_name: String,

    /// Genre display name.
    pub genre: String,

    /// The pipeline stage the session had reached.
    pub stage: String,

    /// Number of characters in the story bible.
    pub character_count: usize,

    /// When the save was created (duplicated from parent for peek access).
    #[serde(default)]
    pub saved_at: String,
}

impl SavedStudio {
    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Load from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        let saved: Self = serde_json::from_str(&content)?;

        if saved.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: saved.version,
            });
        }

        Ok(saved)
    }

    /// Get a save file's metadata without loading the full state.
    pub async fn peek_metadata(path: impl AsRef<Path>) -> Result<SaveMetadata, PersistError> {
        let content = fs::read_to_string(path).await?;

        // Parse just enough to get metadata
        #[derive(Deserialize)]
        struct Partial {
            version: u32,
            metadata: SaveMetadata,
        }

        let partial: Partial = serde_json::from_str(&content)?;

        if partial.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: partial.version,
            });
        }

        Ok(partial.metadata)
    }
}

/// Information about a save file.
#[derive(Debug, Clone)]
pub struct SaveInfo {
    /// Path to the save file.
    pub path: String,

    /// Save metadata.
    pub metadata: SaveMetadata,
}

/// List all save files in a directory.
///
/// Creates the directory if it does not exist. Files that fail to parse
/// are skipped.
pub async fn list_saves(dir: impl AsRef<Path>) -> Result<Vec<SaveInfo>, PersistError> {
    let mut saves = Vec::new();

    let dir_path = dir.as_ref();
    if !dir_path.exists() {
        fs::create_dir_all(dir_path).await?;
        return Ok(saves);
    }

    let mut entries = fs::read_dir(dir_path).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            if let Ok(metadata) = SavedStudio::peek_metadata(&path).await {
                saves.push(SaveInfo {
                    path: path.to_string_lossy().to_string(),
                    metadata,
                });
            }
        }
    }

    saves.sort_by(|a, b| b.metadata.saved_at.cmp(&a.metadata.saved_at));
    Ok(saves)
}

/// Find the most recent save file in a directory, if any.
pub async fn latest_save(dir: impl AsRef<Path>) -> Result<Option<SaveInfo>, PersistError> {
    let mut saves = list_saves(dir).await?;
    if saves.is_empty() {
        Ok(None)
    } else {
        Ok(Some(saves.remove(0)))
    }
}

/// Create an auto-save file name for a project.
pub fn auto_save_path(base_dir: impl AsRef<Path>, project_name: &str) -> std::path::PathBuf {
    base_dir
        .as_ref()
        .join(format!("{}_autosave.json", sanitize(project_name)))
}

/// Create a manual save file name with timestamp.
pub fn manual_save_path(base_dir: impl AsRef<Path>, project_name: &str) -> std::path::PathBuf {
    let stamp = timestamp().replace([':', '-', 'T', '+', '.'], "_");
    base_dir
        .as_ref()
        .join(format!("{}_{stamp}.json", sanitize(project_name)))
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Current timestamp as an RFC 3339 string.
pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_save(project_name: &str) -> SavedStudio {
        let config = StudioConfig::new(project_name);
        let saved_at = timestamp();
        SavedStudio {
            version: SAVE_VERSION,
            saved_at: saved_at.clone(),
            metadata: SaveMetadata {
                project_name: config.project_name.clone(),
                genre: config.genre.name().to_string(),
                stage: "Draft".to_string(),
                character_count: 0,
                saved_at,
            },
            config,
            bible: StoryBible::new(),
            premise: "A heist goes wrong".to_string(),
            scene_card: "{\"title\": \"The Heist\", \"beats\": [\"1.\"]}".to_string(),
            draft: "The vault door hissed open.".to_string(),
            report: String::new(),
            drafted_card: None,
        }
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("project.json");

        let saved = sample_save("Neon Rain");
        saved.save_json(&path).await.expect("Save should succeed");
        assert!(path.exists());

        let loaded = SavedStudio::load_json(&path).await.expect("Load should succeed");
        assert_eq!(loaded.premise, "A heist goes wrong");
        assert_eq!(loaded.metadata.project_name, "Neon Rain");
        assert_eq!(loaded.draft, "The vault door hissed open.");
    }

    #[tokio::test]
    async fn test_peek_metadata() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("peek.json");

        sample_save("Peek Test")
            .save_json(&path)
            .await
            .expect("Save should succeed");

        let metadata = SavedStudio::peek_metadata(&path)
            .await
            .expect("Peek should succeed");
        assert_eq!(metadata.project_name, "Peek Test");
        assert_eq!(metadata.stage, "Draft");
    }

    #[tokio::test]
    async fn test_version_mismatch_rejected() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("future.json");

        let mut saved = sample_save("Future");
        saved.version = SAVE_VERSION + 1;
        let content = serde_json::to_string_pretty(&saved).expect("Serialize should succeed");
        tokio::fs::write(&path, content)
            .await
            .expect("Write should succeed");

        let err = SavedStudio::load_json(&path).await.unwrap_err();
        assert!(matches!(
            err,
            PersistError::VersionMismatch { expected: SAVE_VERSION, .. }
        ));
    }

    #[tokio::test]
    async fn test_list_saves() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        for name in ["Alpha", "Beta"] {
            let path = temp_dir.path().join(format!("{name}.json"));
            sample_save(name).save_json(&path).await.expect("Save should succeed");
        }
        // Non-save noise is skipped
        tokio::fs::write(temp_dir.path().join("notes.txt"), "hi")
            .await
            .expect("Write should succeed");

        let saves = list_saves(temp_dir.path()).await.expect("List should succeed");
        assert_eq!(saves.len(), 2);
    }

    #[tokio::test]
    async fn test_list_saves_creates_missing_dir() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = temp_dir.path().join("saves");

        let saves = list_saves(&dir).await.expect("List should succeed");
        assert!(saves.is_empty());
        assert!(dir.exists());
    }

    #[tokio::test]
    async fn test_latest_save_picks_newest() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let mut older = sample_save("Older");
        older.metadata.saved_at = "2026-01-01T00:00:00+00:00".to_string();
        older
            .save_json(temp_dir.path().join("older.json"))
            .await
            .expect("Save should succeed");

        let mut newer = sample_save("Newer");
        newer.metadata.saved_at = "2026-06-01T00:00:00+00:00".to_string();
        newer
            .save_json(temp_dir.path().join("newer.json"))
            .await
            .expect("Save should succeed");

        let latest = latest_save(temp_dir.path())
            .await
            .expect("List should succeed")
            .expect("A save should be found");
        assert_eq!(latest.metadata.project_name, "Newer");
    }

    #[tokio::test]
    async fn test_latest_save_empty_dir() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let latest = latest_save(temp_dir.path()).await.expect("List should succeed");
        assert!(latest.is_none());
    }

    #[test]
    fn test_auto_save_path_sanitizes() {
        let path = auto_save_path("/saves", "My Project!");
        assert!(path.to_string_lossy().contains("My_Project__autosave"));
    }
}
