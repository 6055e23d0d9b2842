//! Scene cards: the structured, human-editable outline between premise and draft.
//!
//! A scene card is a small JSON document (`title` + `beats`). The outline
//! stage must produce one, the user may edit it freely, and the draft stage
//! validates it before writing prose.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from parsing or validating a scene card.
#[derive(Debug, Error)]
pub enum SceneCardError {
    #[error("Not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No JSON object found in text")]
    NoJson,

    #[error("Invalid scene card: {0}")]
    Invalid(String),
}

/// A structured chapter outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneCard {
    /// Working title for the chapter.
    pub title: String,

    /// Ordered story beats.
    pub beats: Vec<String>,
}

impl SceneCard {
    /// Parse a scene card from text.
    ///
    /// Tolerates surrounding prose and markdown fences: the first `{` to the
    /// last `}` is treated as the JSON document. Model output routinely
    /// arrives wrapped that way.
    pub fn parse(text: &str) -> Result<SceneCard, SceneCardError> {
        let json = extract_json_object(text).ok_or(SceneCardError::NoJson)?;
        let card: SceneCard = serde_json::from_str(json)?;
        card.validate()?;
        Ok(card)
    }

    /// Render the card as pretty-printed JSON, the form kept in the session
    /// slot and shown to the user for editing.
    pub fn to_text(&self) -> String {
        // SceneCard contains only strings and vectors, serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    fn validate(&self) -> Result<(), SceneCardError> {
        if self.title.trim().is_empty() {
            return Err(SceneCardError::Invalid("title is empty".to_string()));
        }
        if self.beats.is_empty() {
            return Err(SceneCardError::Invalid("no beats".to_string()));
        }
        if self.beats.iter().any(|b| b.trim().is_empty()) {
            return Err(SceneCardError::Invalid("blank beat".to_string()));
        }
        Ok(())
    }
}

/// Find the outermost JSON object in a block of text.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let card = SceneCard::parse(
            r#"{"title": "The Setup", "beats": ["Jinx hacks the mainframe", "A trap springs"]}"#,
        )
        .unwrap();

        assert_eq!(card.title, "The Setup");
        assert_eq!(card.beats.len(), 2);
    }

    #[test]
    fn test_parse_fenced_json() {
        let text = "Here is your outline:\n```json\n{\"title\": \"T\", \"beats\": [\"b1\"]}\n```\nEnjoy!";
        let card = SceneCard::parse(text).unwrap();
        assert_eq!(card.title, "T");
    }

    #[test]
    fn test_parse_no_json() {
        let err = SceneCard::parse("just prose, no structure").unwrap_err();
        assert!(matches!(err, SceneCardError::NoJson));
    }

    #[test]
    fn test_parse_rejects_empty_beats() {
        let err = SceneCard::parse(r#"{"title": "T", "beats": []}"#).unwrap_err();
        assert!(matches!(err, SceneCardError::Invalid(_)));
    }

    #[test]
    fn test_parse_rejects_blank_title() {
        let err = SceneCard::parse(r#"{"title": "  ", "beats": ["b"]}"#).unwrap_err();
        assert!(matches!(err, SceneCardError::Invalid(_)));
    }

    #[test]
    fn test_text_round_trip() {
        let card = SceneCard {
            title: "Mock Outline for Cyberpunk".to_string(),
            beats: vec!["1. The Setup".to_string(), "2. Betrayal".to_string()],
        };

        let reparsed = SceneCard::parse(&card.to_text()).unwrap();
        assert_eq!(card, reparsed);
    }
}
