use serde::{Deserialize, Serialize};

use crate::models::Post;
use crate::options::{GenerationOptions, HashtagStrategy, KNOWN_VARIATIONS, Language, Platform, Tone};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub url: String,
    #[serde(default)]
    pub existing_posts: Vec<Post>,
    pub options: GenerationOptions,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateRequest {
    pub url: String,
    pub posts: Vec<Post>,
    pub post_id: String,
    pub options: GenerationOptions,
}

#[derive(Serialize)]
pub struct VariationChoice {
    pub id: &'static str,
    pub label: &'static str,
}

/// Everything the form can offer, so the UI does not hard-code it.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsCatalog {
    pub tones: Vec<Tone>,
    pub platforms: Vec<Platform>,
    pub languages: Vec<Language>,
    pub hashtag_strategies: Vec<HashtagStrategy>,
    pub post_variations: Vec<VariationChoice>,
}

impl OptionsCatalog {
    pub fn current() -> Self {
        OptionsCatalog {
            tones: Tone::ALL.to_vec(),
            platforms: Platform::ALL.to_vec(),
            languages: Language::ALL.to_vec(),
            hashtag_strategies: HashtagStrategy::ALL.to_vec(),
            post_variations: KNOWN_VARIATIONS
                .iter()
                .map(|&(id, label)| VariationChoice { id, label })
                .collect(),
        }
    }
}
