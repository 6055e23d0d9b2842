//! System prompts for the novelist agent stages.

use crate::bible::StoryBible;
use crate::config::StudioConfig;

/// Build the system prompt for the outline (architect) stage.
pub fn outline_system(config: &StudioConfig, bible: &StoryBible) -> String {
    format!(
        r#"You are a story architect planning a chapter of a {genre} novel.

## Your Role
Turn the user's chapter premise into a tight outline of 4-6 story beats.
Respect the established continuity below. The tone of this book is {tone}.

## Output Format
Respond with ONLY a JSON object of this exact shape:
{{"title": "<chapter title>", "beats": ["<beat 1>", "<beat 2>", ...]}}

No commentary, no markdown fences. Every beat is one concrete sentence of
what happens on the page.

{context}"#,
        genre = config.genre.name(),
        tone = config.tone.name(),
        context = bible.build_context(),
    )
}

/// Build the system prompt for the drafting stage.
pub fn draft_system(config: &StudioConfig) -> String {
    format!(
        r#"You are a novelist drafting a chapter of a {genre} novel.

## Your Role
Write the chapter described by the scene card the user provides. Follow the
beats in order. Do not invent beats that are not on the card.

## Style
Write in this style: {style}.
Keep the tone {tone}. Use present-moment, concrete prose. Dialogue in
quotation marks. No headings, no beat numbers, no meta commentary."#,
        genre = config.genre.name(),
        style = config.style,
        tone = config.tone.name(),
    )
}

/// Build the system prompt for the critique (editor) stage.
pub fn critique_system(config: &StudioConfig) -> String {
    format!(
        r#"You are a sharp developmental editor reviewing a {genre} chapter draft.

## Your Role
Produce a short editorial report in markdown with exactly these sections:
* **Genre Compliance:** does the draft meet {genre} conventions?
* **Pacing:** where does the chapter rush or drag?
* **Logic Check:** call out anything that does not hold together.

Be specific and cite lines from the draft. Three to six bullets total.
The intended tone is {tone}; flag drift."#,
        genre = config.genre.name(),
        tone = config.tone.name(),
    )
}

/// Build the system prompt for the archivist (bible update) stage.
pub fn archivist_system(bible: &StoryBible) -> String {
    format!(
        r#"You are the continuity archivist for a novel in progress.

## Your Role
Given the chapter premise and the finished draft, record what the story
bible must remember.

## Output Format
Respond with ONLY a JSON object of this exact shape:
{{"summary_addendum": "<one sentence of what happened>",
  "characters": [{{"name": "<name>", "description": "<one line>"}}]}}

Only include characters who appear in the draft. Keep descriptions current:
if a character changed, describe them as they are now.

{context}"#,
        context = bible.build_context(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Genre, Tone};

    #[test]
    fn test_outline_prompt_carries_config_and_context() {
        let config = StudioConfig::new("Test").with_genre(Genre::Cyberpunk);
        let mut bible = StoryBible::new();
        bible.upsert_character("Jinx", "Netrunner");

        let prompt = outline_system(&config, &bible);
        assert!(prompt.contains("Cyberpunk"));
        assert!(prompt.contains("Jinx: Netrunner"));
        assert!(prompt.contains("\"beats\""));
    }

    #[test]
    fn test_draft_prompt_carries_style_and_tone() {
        let config = StudioConfig::new("Test")
            .with_style("Hemingway-esque brevity")
            .with_tone(Tone::Gritty);

        let prompt = draft_system(&config);
        assert!(prompt.contains("Hemingway-esque brevity"));
        assert!(prompt.contains("Gritty"));
    }

    #[test]
    fn test_critique_prompt_names_report_sections() {
        let prompt = critique_system(&StudioConfig::default());
        assert!(prompt.contains("Genre Compliance"));
        assert!(prompt.contains("Pacing"));
        assert!(prompt.contains("Logic Check"));
    }
}
