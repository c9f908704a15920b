use serde::{Deserialize, Serialize};
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Tone {
    #[default]
    Engaging,
    Professional,
    Witty,
    Casual,
    Informative,
    Inspirational,
}

impl Tone {
    pub const ALL: [Tone; 6] = [
        Tone::Engaging,
        Tone::Professional,
        Tone::Witty,
        Tone::Casual,
        Tone::Informative,
        Tone::Inspirational,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tone::Engaging => "Engaging",
            Tone::Professional => "Professional",
            Tone::Witty => "Witty",
            Tone::Casual => "Casual",
            Tone::Informative => "Informative",
            Tone::Inspirational => "Inspirational",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Platform {
    #[default]
    #[serde(rename = "X (Twitter)", alias = "X/Twitter", alias = "Twitter", alias = "X")]
    Twitter,
    LinkedIn,
    Instagram,
    Threads,
    Facebook,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Twitter,
        Platform::LinkedIn,
        Platform::Instagram,
        Platform::Threads,
        Platform::Facebook,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Platform::Twitter => "X (Twitter)",
            Platform::LinkedIn => "LinkedIn",
            Platform::Instagram => "Instagram",
            Platform::Threads => "Threads",
            Platform::Facebook => "Facebook",
        }
    }

    /// Formatting rule given to the model for this platform.
    pub fn formatting_rule(self) -> &'static str {
        match self {
            Platform::Twitter => {
                "Strictly under 280 characters. Short, punchy, and include 2-3 relevant hashtags."
            }
            Platform::LinkedIn => {
                "Professional, detailed post of around 500-1000 characters. Provide insights, encourage discussion, and use professional hashtags."
            }
            Platform::Instagram => {
                "A visually descriptive, engaging caption of medium length. Use 5-7 popular hashtags and a clear call-to-action."
            }
            Platform::Threads => "Short, casual, conversational, and perfect for starting a dialogue.",
            Platform::Facebook => {
                "Longer than a tweet and friendly. It may end with a question or a call-to-action to invite comments."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    English,
    Spanish,
    French,
    German,
    Portuguese,
    Italian,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Portuguese,
        Language::Italian,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Portuguese => "Portuguese",
            Language::Italian => "Italian",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HashtagStrategy {
    Subtle,
    #[default]
    Balanced,
    Heavy,
}

impl HashtagStrategy {
    pub const ALL: [HashtagStrategy; 3] = [
        HashtagStrategy::Subtle,
        HashtagStrategy::Balanced,
        HashtagStrategy::Heavy,
    ];

    pub fn policy(self) -> &'static str {
        match self {
            HashtagStrategy::Subtle => {
                "Use hashtags sparingly: at most one or two per post, and only where they add clear value."
            }
            HashtagStrategy::Balanced => {
                "Use a moderate number of relevant hashtags, following the platform guidance above."
            }
            HashtagStrategy::Heavy => {
                "Use hashtags generously to maximize discoverability, at the upper end of what the platform tolerates."
            }
        }
    }
}

/// Post types the UI offers out of the box. Callers may request other ids too.
pub const KNOWN_VARIATIONS: [(&str, &str); 8] = [
    ("hook", "Intriguing Hook"),
    ("summary", "Key Summary"),
    ("question", "Engaging Question"),
    ("takeaway", "Actionable Takeaway"),
    ("listicle", "Quick List"),
    ("quote", "Standout Quote"),
    ("poll", "Poll Prompt"),
    ("story", "Short Story"),
];

pub fn variation_label(id: &str) -> Option<&'static str> {
    KNOWN_VARIATIONS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(id))
        .map(|(_, label)| *label)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub language: Language,
    pub post_variations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
    #[serde(default)]
    pub hashtag_strategy: HashtagStrategy,
    #[serde(default)]
    pub include_image_prompt: bool,
}

impl GenerationOptions {
    pub fn new(post_variations: Vec<String>) -> Self {
        GenerationOptions {
            tone: Tone::default(),
            platform: Platform::default(),
            language: Language::default(),
            post_variations,
            audience: None,
            cta: None,
            custom_instructions: None,
            hashtag_strategy: HashtagStrategy::default(),
            include_image_prompt: false,
        }
    }

    /// Trims and de-duplicates the requested variations (first occurrence wins)
    /// and blanks out empty free-text fields. Fails when no variation is left.
    pub fn normalized(mut self) -> Result<Self> {
        let mut variations: Vec<String> = Vec::with_capacity(self.post_variations.len());
        for variation in self.post_variations.drain(..) {
            let variation = variation.trim();
            if !variation.is_empty() && !variations.iter().any(|v| v == variation) {
                variations.push(variation.to_string());
            }
        }
        if variations.is_empty() {
            return Err(AppError::InvalidInput(
                "Please select at least one post variation.".to_string(),
            ));
        }
        self.post_variations = variations;
        self.audience = non_blank(self.audience);
        self.cta = non_blank(self.cta);
        self.custom_instructions = non_blank(self.custom_instructions);
        Ok(self)
    }

    /// Same options, asking for a single variation only.
    pub fn narrowed_to(&self, variation: &str) -> Self {
        GenerationOptions {
            post_variations: vec![variation.to_string()],
            ..self.clone()
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
