use std::collections::BTreeSet;

use parley_tools::ToolName;
use regex::{Regex, RegexBuilder};

/// Guesses which tools a text-only answer wanted to use
pub trait IntentDetector: Send + Sync {
    fn detect(&self, text: &str) -> BTreeSet<ToolName>;
}

/// Word-boundary keyword matching per tool
pub struct KeywordIntents {
    patterns: Vec<(ToolName, Regex)>,
}

const IMAGE_KEYWORDS: &[&str] = &[
    "image",
    "images",
    "picture",
    "pictures",
    "photo",
    "draw",
    "drawing",
    "illustration",
    "illustrate",
    "sketch",
    "paint",
    "painting",
];

const WEATHER_KEYWORDS: &[&str] = &[
    "weather",
    "temperature",
    "forecast",
    "humidity",
    "rain",
    "raining",
    "snow",
    "sunny",
    "windy",
];

impl KeywordIntents {
    /// Detector with an explicit keyword list per tool
    ///
    /// # Errors
    ///
    /// Returns an error if a keyword list does not form a valid pattern.
    pub fn new(keywords: &[(ToolName, &[&str])]) -> Result<Self, regex::Error> {
        let patterns = keywords
            .iter()
            .map(|(tool, words)| {
                let alternation = words.iter().map(|w| regex::escape(w)).collect::<Vec<_>>().join("|");
                RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
                    .case_insensitive(true)
                    .build()
                    .map(|regex| (*tool, regex))
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { patterns })
    }
}

impl Default for KeywordIntents {
    fn default() -> Self {
        // Escaped literal alternations always compile
        Self::new(&[
            (ToolName::GenerateImage, IMAGE_KEYWORDS),
            (ToolName::GetWeather, WEATHER_KEYWORDS),
        ])
        .unwrap_or(Self { patterns: Vec::new() })
    }
}

impl IntentDetector for KeywordIntents {
    fn detect(&self, text: &str) -> BTreeSet<ToolName> {
        self.patterns
            .iter()
            .filter(|(_, regex)| regex.is_match(text))
            .map(|(tool, _)| *tool)
            .collect()
    }
}
