use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, Result};

/// A model that answers a prompt with JSON text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Checks that the generator can be called at all (credentials and the like).
    fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }

    async fn generate_json(&self, prompt: &str) -> Result<String>;
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    temperature: f32,
    top_p: f32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
}

impl GeminiClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(config.generate_timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(GeminiClient {
            client,
            api_key: config.gemini_api_key.clone(),
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
            temperature: config.temperature,
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            AppError::ConfigError("the GEMINI_API_KEY credential is not set on the server.".to_string())
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn ensure_ready(&self) -> Result<()> {
        self.api_key().map(|_| ())
    }

    async fn generate_json(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key()?;
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                temperature: self.temperature,
                top_p: 0.95,
            },
        };

        let endpoint = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!(model = %self.model, prompt_chars = prompt.len(), "Calling generative language API");

        let res = self
            .client
            .post(&endpoint)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Generative language API returned an error status");
            return Err(AppError::UpstreamError(status.as_u16()));
        }

        let json: serde_json::Value = res.json().await?;
        candidate_text(&json)
    }
}

/// Pulls the generated text out of a `generateContent` response.
pub fn candidate_text(json: &serde_json::Value) -> Result<String> {
    json["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            let reason = json["candidates"][0]["finishReason"]
                .as_str()
                .or_else(|| json["promptFeedback"]["blockReason"].as_str())
                .unwrap_or("no candidate text");
            AppError::ResponseParseError(format!("the model returned no usable text ({})", reason))
        })
}
