use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Text extracted from a fetched page.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedPage {
    pub title: String,
    pub description: String,
    pub body_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedInfo {
    pub title: String,
    pub description: String,
    /// One-sentence summary written by the model, when it provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub variation: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
}

impl Post {
    pub fn new(variation: impl Into<String>, content: impl Into<String>) -> Self {
        Post {
            id: Uuid::new_v4().to_string(),
            variation: variation.into(),
            content: content.into(),
            engagement_score: None,
            image_prompt: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub scraped_info: ScrapedInfo,
    pub posts: Vec<Post>,
    pub generated_at: DateTime<Utc>,
}
