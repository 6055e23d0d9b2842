//! Studio configuration: genre, tone, author style, and model settings.

use serde::{Deserialize, Serialize};

/// Story genre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Genre {
    #[default]
    TechnoThriller,
    Cyberpunk,
    HighFantasy,
    Romance,
}

impl Genre {
    /// All available genres, in display order.
    pub const ALL: [Genre; 4] = [
        Genre::TechnoThriller,
        Genre::Cyberpunk,
        Genre::HighFantasy,
        Genre::Romance,
    ];

    /// Display name for the genre.
    pub fn name(&self) -> &'static str {
        match self {
            Genre::TechnoThriller => "Techno-Thriller",
            Genre::Cyberpunk => "Cyberpunk",
            Genre::HighFantasy => "High Fantasy",
            Genre::Romance => "Romance",
        }
    }

    /// Parse a genre from user input.
    pub fn parse(s: &str) -> Option<Genre> {
        match s.to_lowercase().replace([' ', '_'], "-").as_str() {
            "techno-thriller" | "thriller" => Some(Genre::TechnoThriller),
            "cyberpunk" => Some(Genre::Cyberpunk),
            "high-fantasy" | "fantasy" => Some(Genre::HighFantasy),
            "romance" => Some(Genre::Romance),
            _ => None,
        }
    }

    /// The next genre in display order (wraps around).
    pub fn next(&self) -> Genre {
        let idx = Self::ALL.iter().position(|g| g == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Tone intensity for the prose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tone {
    Light,
    #[default]
    Balanced,
    Gritty,
    Dark,
}

impl Tone {
    /// All tones, from lightest to darkest.
    pub const ALL: [Tone; 4] = [Tone::Light, Tone::Balanced, Tone::Gritty, Tone::Dark];

    /// Display name for the tone.
    pub fn name(&self) -> &'static str {
        match self {
            Tone::Light => "Light",
            Tone::Balanced => "Balanced",
            Tone::Gritty => "Gritty",
            Tone::Dark => "Dark",
        }
    }

    /// Parse a tone from user input.
    pub fn parse(s: &str) -> Option<Tone> {
        match s.to_lowercase().as_str() {
            "light" => Some(Tone::Light),
            "balanced" => Some(Tone::Balanced),
            "gritty" => Some(Tone::Gritty),
            "dark" => Some(Tone::Dark),
            _ => None,
        }
    }

    /// The next tone on the intensity slider (wraps around).
    pub fn next(&self) -> Tone {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Configuration for a writing project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Project name.
    pub project_name: String,

    /// Story genre.
    pub genre: Genre,

    /// Tone intensity.
    pub tone: Tone,

    /// Author style directive for the drafting stage.
    pub style: String,

    /// Model to use for generation.
    pub model: Option<String>,

    /// Maximum tokens for generated responses.
    pub max_tokens: usize,

    /// Temperature for generation.
    pub temperature: Option<f32>,
}

impl StudioConfig {
    /// Create a new config with the given project name.
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            genre: Genre::default(),
            tone: Tone::default(),
            style: "Hemingway-esque brevity".to_string(),
            model: None,
            max_tokens: 4096,
            temperature: Some(0.7),
        }
    }

    /// Set the genre.
    pub fn with_genre(mut self, genre: Genre) -> Self {
        self.genre = genre;
        self
    }

    /// Set the tone.
    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    /// Set the author style directive.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Set the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set max tokens for responses.
    pub fn with_max_tokens(mut self, tokens: usize) -> Self {
        self.max_tokens = tokens;
        self
    }

    /// Set temperature for generation.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self::new("Untitled Project")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = StudioConfig::new("Neon Rain")
            .with_genre(Genre::Cyberpunk)
            .with_tone(Tone::Gritty)
            .with_style("Short, punchy sentences")
            .with_max_tokens(2048);

        assert_eq!(config.project_name, "Neon Rain");
        assert_eq!(config.genre, Genre::Cyberpunk);
        assert_eq!(config.tone, Tone::Gritty);
        assert_eq!(config.max_tokens, 2048);
    }

    #[test]
    fn test_genre_parse() {
        assert_eq!(Genre::parse("cyberpunk"), Some(Genre::Cyberpunk));
        assert_eq!(Genre::parse("High Fantasy"), Some(Genre::HighFantasy));
        assert_eq!(Genre::parse("techno-thriller"), Some(Genre::TechnoThriller));
        assert_eq!(Genre::parse("western"), None);
    }

    #[test]
    fn test_tone_parse() {
        assert_eq!(Tone::parse("Gritty"), Some(Tone::Gritty));
        assert_eq!(Tone::parse("dark"), Some(Tone::Dark));
        assert_eq!(Tone::parse("loud"), None);
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(Genre::Romance.next(), Genre::TechnoThriller);
        assert_eq!(Tone::Dark.next(), Tone::Light);
    }

    #[test]
    fn test_default_style_matches_prototype() {
        let config = StudioConfig::default();
        assert_eq!(config.style, "Hemingway-esque brevity");
    }
}
