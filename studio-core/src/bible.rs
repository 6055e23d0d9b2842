//! The story bible: persistent memory of characters and plot progress.
//!
//! The bible is the studio's long-lived context. The summary is append-only
//! and grows as chapters are processed; characters are upserted by name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Unique identifier for a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

/// A character tracked in the story bible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub description: String,
}

/// The story bible: a characters collection and a running plot summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryBible {
    /// Characters keyed by lowercased name.
    characters: BTreeMap<String, Character>,

    /// Running plot summary, appended to as chapters are processed.
    summary: String,
}

impl StoryBible {
    /// Create a new, empty bible.
    pub fn new() -> Self {
        Self {
            characters: BTreeMap::new(),
            summary: "Start of the story.".to_string(),
        }
    }

    /// The running summary.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// All tracked characters, in name order.
    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }

    /// Number of tracked characters.
    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    /// Find a character by name (case-insensitive).
    pub fn find_character(&self, name: &str) -> Option<&Character> {
        self.characters.get(&name.to_lowercase())
    }

    /// Insert a character, or update its description if the name already exists.
    pub fn upsert_character(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> CharacterId {
        let name = name.into();
        let key = name.to_lowercase();

        if let Some(existing) = self.characters.get_mut(&key) {
            existing.description = description.into();
            existing.id
        } else {
            let character = Character {
                id: CharacterId::new(),
                name,
                description: description.into(),
            };
            let id = character.id;
            self.characters.insert(key, character);
            id
        }
    }

    /// Append a note to the running summary. The summary only ever grows.
    pub fn append_summary(&mut self, note: &str) {
        if note.is_empty() {
            return;
        }
        self.summary.push_str(" -> ");
        self.summary.push_str(note);
    }

    /// Apply an archivist update: append the summary note, upsert characters.
    pub fn apply(&mut self, update: &BibleUpdate) {
        self.append_summary(&update.summary_addendum);
        for sketch in &update.characters {
            self.upsert_character(&sketch.name, &sketch.description);
        }
    }

    /// Build a context block for prompts.
    pub fn build_context(&self) -> String {
        let mut context = String::new();

        context.push_str("## Story So Far\n");
        context.push_str(&self.summary);
        context.push('\n');

        if !self.characters.is_empty() {
            context.push_str("\n## Characters\n");
            for character in self.characters.values() {
                context.push_str(&format!("- {}: {}\n", character.name, character.description));
            }
        }

        context
    }
}

impl Default for StoryBible {
    fn default() -> Self {
        Self::new()
    }
}

/// A structured update from the archivist stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BibleUpdate {
    /// Note to append to the running summary.
    pub summary_addendum: String,

    /// Characters seen or changed in the processed chapter.
    #[serde(default)]
    pub characters: Vec<CharacterSketch>,
}

/// A character as reported by the archivist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterSketch {
    pub name: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_bible_starts_story() {
        let bible = StoryBible::new();
        assert_eq!(bible.summary(), "Start of the story.");
        assert_eq!(bible.character_count(), 0);
    }

    #[test]
    fn test_summary_append_only() {
        let mut bible = StoryBible::new();
        bible.append_summary("Processed premise: Jinx hacks the mainframe");

        assert_eq!(
            bible.summary(),
            "Start of the story. -> Processed premise: Jinx hacks the mainframe"
        );

        bible.append_summary("Processed premise: The trap springs");
        assert!(bible.summary().starts_with("Start of the story."));
        assert!(bible.summary().ends_with("The trap springs"));
    }

    #[test]
    fn test_empty_note_ignored() {
        let mut bible = StoryBible::new();
        bible.append_summary("");
        assert_eq!(bible.summary(), "Start of the story.");
    }

    #[test]
    fn test_upsert_character() {
        let mut bible = StoryBible::new();
        let id = bible.upsert_character("Jinx", "A nervous netrunner");
        assert_eq!(bible.character_count(), 1);

        // Same name updates in place, case-insensitively
        let id2 = bible.upsert_character("jinx", "A confident netrunner");
        assert_eq!(id, id2);
        assert_eq!(bible.character_count(), 1);
        assert_eq!(
            bible.find_character("JINX").map(|c| c.description.as_str()),
            Some("A confident netrunner")
        );
    }

    #[test]
    fn test_apply_update() {
        let mut bible = StoryBible::new();
        let update = BibleUpdate {
            summary_addendum: "Jinx triggered the trap".to_string(),
            characters: vec![CharacterSketch {
                name: "Jinx".to_string(),
                description: "Protagonist, in over her head".to_string(),
            }],
        };

        bible.apply(&update);

        assert!(bible.summary().contains("triggered the trap"));
        assert!(bible.find_character("Jinx").is_some());
    }

    #[test]
    fn test_build_context() {
        let mut bible = StoryBible::new();
        bible.upsert_character("Mara", "The betrayer");

        let context = bible.build_context();
        assert!(context.contains("Story So Far"));
        assert!(context.contains("Mara: The betrayer"));
    }
}
