//! The live novelist agent.
//!
//! Drives the three generation stages (outline, draft, critique) plus the
//! archivist bible update through the OpenAI API. Structured stages (outline
//! and archivist) validate the model's JSON and retry with the parse error
//! fed back to the model before giving up.

use super::prompts;
use crate::bible::{BibleUpdate, StoryBible};
use crate::config::StudioConfig;
use crate::scene::SceneCard;
use futures::StreamExt;
use openai::{Message, OpenAi, Request, StreamEvent};
use thiserror::Error;
use tracing::{info, warn};

/// How many times a structured stage is retried after invalid output.
const MAX_VALIDATION_RETRIES: u32 = 2;

/// Errors from the novelist agent.
#[derive(Debug, Error)]
pub enum NovelistError {
    #[error("OpenAI API error: {0}")]
    Api(#[from] openai::Error),

    #[error("No API key configured - set OPENAI_API_KEY environment variable")]
    NoApiKey,

    #[error("Outline was not a valid scene card after {attempts} attempts: {last_error}")]
    InvalidOutline { attempts: u32, last_error: String },

    #[error("Archivist update was not valid after {attempts} attempts: {last_error}")]
    InvalidBibleUpdate { attempts: u32, last_error: String },
}

/// The live, API-backed novelist.
pub struct Novelist {
    client: OpenAi,
}

impl Novelist {
    /// Create a novelist with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: OpenAi::new(api_key),
        }
    }

    /// Create a novelist from the OPENAI_API_KEY environment variable.
    pub fn from_env() -> Result<Self, NovelistError> {
        let client = OpenAi::from_env().map_err(|_| NovelistError::NoApiKey)?;
        Ok(Self { client })
    }

    /// Generate a scene card from a chapter premise.
    ///
    /// Returns the card rendered as pretty JSON, ready for human editing.
    pub async fn outline(
        &self,
        premise: &str,
        config: &StudioConfig,
        bible: &StoryBible,
    ) -> Result<String, NovelistError> {
        let system = prompts::outline_system(config, bible);
        let mut messages = vec![Message::user(premise)];
        let mut last_error = String::new();

        for attempt in 0..=MAX_VALIDATION_RETRIES {
            let request = self
                .base_request(messages.clone(), config)
                .with_system(system.as_str())
                .with_json_output();

            let response = self.client.complete(request).await?;
            info!(attempt, tokens = response.usage.completion_tokens, "outline generated");

            match SceneCard::parse(&response.content) {
                Ok(card) => return Ok(card.to_text()),
                Err(e) => {
                    warn!(attempt, error = %e, "outline failed validation, retrying");
                    last_error = e.to_string();
                    messages.push(Message::assistant(response.content));
                    messages.push(Message::user(format!(
                        "That was not a valid scene card ({last_error}). Respond again \
                         with ONLY the JSON object, exactly the required shape."
                    )));
                }
            }
        }

        Err(NovelistError::InvalidOutline {
            attempts: MAX_VALIDATION_RETRIES + 1,
            last_error,
        })
    }

    /// Write a chapter draft from an (edited) scene card.
    pub async fn draft(
        &self,
        card_text: &str,
        config: &StudioConfig,
    ) -> Result<String, NovelistError> {
        let request = self
            .base_request(vec![Message::user(card_text)], config)
            .with_system(prompts::draft_system(config));

        let response = self.client.complete(request).await?;
        info!(tokens = response.usage.completion_tokens, "draft generated");
        Ok(response.content)
    }

    /// Write a chapter draft, streaming deltas through `on_delta` as they
    /// arrive. Returns the complete draft.
    pub async fn draft_stream(
        &self,
        card_text: &str,
        config: &StudioConfig,
        on_delta: &mut (dyn FnMut(&str) + Send),
    ) -> Result<String, NovelistError> {
        let request = self
            .base_request(vec![Message::user(card_text)], config)
            .with_system(prompts::draft_system(config));

        let mut stream = self.client.stream(request).await?;
        let mut draft = String::new();

        while let Some(event) = stream.next().await {
            match event? {
                StreamEvent::Delta { text } => {
                    draft.push_str(&text);
                    on_delta(&text);
                }
                StreamEvent::Finished { .. } => {}
                StreamEvent::Done => break,
            }
        }

        info!(chars = draft.len(), "draft stream complete");
        Ok(draft)
    }

    /// Produce an editorial report for a draft.
    pub async fn critique(
        &self,
        draft: &str,
        config: &StudioConfig,
    ) -> Result<String, NovelistError> {
        let request = self
            .base_request(vec![Message::user(draft)], config)
            .with_system(prompts::critique_system(config));

        let response = self.client.complete(request).await?;
        info!(tokens = response.usage.completion_tokens, "critique generated");
        Ok(response.content)
    }

    /// Ask the archivist what the bible should remember about this chapter.
    pub async fn archive(
        &self,
        premise: &str,
        draft: &str,
        config: &StudioConfig,
        bible: &StoryBible,
    ) -> Result<BibleUpdate, NovelistError> {
        let system = prompts::archivist_system(bible);
        let chapter = format!("## Premise\n{premise}\n\n## Draft\n{draft}");
        let mut messages = vec![Message::user(chapter)];
        let mut last_error = String::new();

        for attempt in 0..=MAX_VALIDATION_RETRIES {
            let request = self
                .base_request(messages.clone(), config)
                .with_system(system.as_str())
                .with_json_output();

            let response = self.client.complete(request).await?;

            match parse_bible_update(&response.content) {
                Ok(update) => return Ok(update),
                Err(e) => {
                    warn!(attempt, error = %e, "bible update failed validation, retrying");
                    last_error = e;
                    messages.push(Message::assistant(response.content));
                    messages.push(Message::user(format!(
                        "That was not a valid update ({last_error}). Respond again with \
                         ONLY the JSON object, exactly the required shape."
                    )));
                }
            }
        }

        Err(NovelistError::InvalidBibleUpdate {
            attempts: MAX_VALIDATION_RETRIES + 1,
            last_error,
        })
    }

    fn base_request(&self, messages: Vec<Message>, config: &StudioConfig) -> Request {
        let mut request = Request::new(messages).with_max_tokens(config.max_tokens);

        if let Some(ref model) = config.model {
            request = request.with_model(model);
        }
        if let Some(temp) = config.temperature {
            request = request.with_temperature(temp);
        }

        request
    }
}

/// Parse and validate an archivist response.
fn parse_bible_update(text: &str) -> Result<BibleUpdate, String> {
    let start = text.find('{').ok_or("no JSON object found")?;
    let end = text.rfind('}').ok_or("no JSON object found")?;
    if end < start {
        return Err("no JSON object found".to_string());
    }

    let update: BibleUpdate =
        serde_json::from_str(&text[start..=end]).map_err(|e| e.to_string())?;

    if update.summary_addendum.trim().is_empty() {
        return Err("summary_addendum is empty".to_string());
    }
    if update.characters.iter().any(|c| c.name.trim().is_empty()) {
        return Err("character with blank name".to_string());
    }

    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bible_update() {
        let update = parse_bible_update(
            r#"{"summary_addendum": "Jinx escaped", "characters": [{"name": "Jinx", "description": "On the run"}]}"#,
        )
        .unwrap();

        assert_eq!(update.summary_addendum, "Jinx escaped");
        assert_eq!(update.characters.len(), 1);
    }

    #[test]
    fn test_parse_bible_update_fenced() {
        let text = "```json\n{\"summary_addendum\": \"done\", \"characters\": []}\n```";
        assert!(parse_bible_update(text).is_ok());
    }

    #[test]
    fn test_parse_bible_update_rejects_empty_summary() {
        let err = parse_bible_update(r#"{"summary_addendum": " ", "characters": []}"#).unwrap_err();
        assert!(err.contains("summary_addendum"));
    }

    #[test]
    fn test_parse_bible_update_rejects_no_json() {
        assert!(parse_bible_update("nothing structured here").is_err());
    }
}
