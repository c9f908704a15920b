#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use social_post_generator::error::{AppError, Result};
use social_post_generator::llm::TextGenerator;
use social_post_generator::scraper::{unwrap_envelope, PageFetcher, ProxyEnvelope};

/// Serves a canned proxy envelope and counts calls.
pub struct StubProxy {
    envelope: String,
    pub calls: AtomicUsize,
}

impl StubProxy {
    pub fn new(envelope: serde_json::Value) -> Self {
        StubProxy {
            envelope: envelope.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn page(html: &str) -> Self {
        Self::new(serde_json::json!({ "status": { "http_code": 200 }, "contents": html }))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for StubProxy {
    async fn fetch_page(&self, _url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let envelope: ProxyEnvelope =
            serde_json::from_str(&self.envelope).map_err(|e| AppError::Unknown(e.to_string()))?;
        unwrap_envelope(envelope)
    }
}

/// Replies with canned text and records every prompt it receives.
pub struct StubModel {
    reply: String,
    configured: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl StubModel {
    pub fn replying(reply: impl Into<String>) -> Self {
        StubModel {
            reply: reply.into(),
            configured: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn without_credential() -> Self {
        StubModel {
            configured: false,
            ..Self::replying("{}")
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for StubModel {
    fn ensure_ready(&self) -> Result<()> {
        if self.configured {
            Ok(())
        } else {
            Err(AppError::ConfigError("missing credential".into()))
        }
    }

    async fn generate_json(&self, prompt: &str) -> Result<String> {
        self.ensure_ready()?;
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

pub const HELLO_PAGE: &str = "<html><title>T</title><body>Hello world</body></html>";
