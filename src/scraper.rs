use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder, StatusCode};
use scraper::{Html, Selector};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::models::ScrapedPage;

/// Upper bound on the body text handed to the prompt, in characters.
pub const MAX_BODY_CHARS: usize = 6000;

pub const NO_TITLE: &str = "No title found";
pub const NO_DESCRIPTION: &str = "No description found";

/// Elements whose text never reaches the prompt.
const NON_CONTENT_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "canvas", "iframe", "object", "embed",
    "video", "audio", "picture", "nav", "header", "footer", "aside", "form", "button", "select",
];

// Create static selectors to avoid recompiling them each time
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("title").expect("Failed to parse title selector")
});

static H1_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h1").expect("Failed to parse h1 selector")
});

static DESCRIPTION_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"meta[name="description"]"#).expect("Failed to parse meta description selector")
});

static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("body").expect("Failed to parse body selector")
});

/// Retrieves the raw HTML of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

/// Fetches pages through an "all-origins" style relay that wraps the target's
/// HTML in a JSON envelope.
pub struct ProxyFetcher {
    client: Client,
    proxy_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ProxyEnvelope {
    #[serde(default)]
    pub contents: Option<String>,
    pub status: ProxyStatus,
}

#[derive(Debug, Deserialize)]
pub struct ProxyStatus {
    #[serde(default)]
    pub http_code: Option<u16>,
}

impl ProxyFetcher {
    pub fn new(proxy_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(ProxyFetcher {
            client,
            proxy_url: proxy_url.into(),
        })
    }
}

#[async_trait]
impl PageFetcher for ProxyFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        debug!(url, proxy = %self.proxy_url, "Requesting page through proxy");
        let response = self
            .client
            .get(&self.proxy_url)
            .query(&[("url", url)])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            warn!(url, "Proxy refused the request");
            return Err(AppError::Forbidden);
        }
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "Proxy returned an error status");
            return Err(AppError::UpstreamError(status.as_u16()));
        }

        let envelope: ProxyEnvelope = response.json().await?;
        unwrap_envelope(envelope)
    }
}

/// Checks the status the proxy observed at the target site and returns the page HTML.
pub fn unwrap_envelope(envelope: ProxyEnvelope) -> Result<String> {
    match envelope.status.http_code {
        Some(200) => Ok(envelope.contents.unwrap_or_default()),
        Some(403) => Err(AppError::Forbidden),
        Some(code) => Err(AppError::FetchFailed(code)),
        None => Err(AppError::Unknown(
            "The fetch proxy did not report a status for the target page.".to_string(),
        )),
    }
}

/// Accepts only absolute http(s) URLs. Returns the trimmed URL.
pub fn validate_url(url: &str) -> Result<&str> {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    let host = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"));
    match host {
        Some(rest) if !rest.is_empty() => Ok(url),
        _ => Err(AppError::InvalidInput(
            "Please provide a valid, full URL (including http/https).".to_string(),
        )),
    }
}

pub async fn fetch_and_extract(fetcher: &dyn PageFetcher, url: &str) -> Result<ScrapedPage> {
    let url = validate_url(url)?;

    info!(url, "Fetching page");
    let fetch_start = std::time::Instant::now();
    let html = fetcher.fetch_page(url).await?;
    info!(url, bytes = html.len(), elapsed = ?fetch_start.elapsed(), "Page fetched");

    let page = extract_page(&html);
    debug!(
        title = %page.title,
        body_chars = page.body_text.chars().count(),
        "Extracted page content"
    );
    Ok(page)
}

pub fn extract_page(html: &str) -> ScrapedPage {
    let document = Html::parse_document(html);

    let title = first_text(&document, &TITLE_SELECTOR)
        .or_else(|| first_text(&document, &H1_SELECTOR))
        .unwrap_or_else(|| NO_TITLE.to_string());

    let description = document
        .select(&DESCRIPTION_SELECTOR)
        .filter_map(|meta| meta.value().attr("content"))
        .map(normalize_whitespace)
        .find(|content| !content.is_empty())
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());

    let body_text = document
        .select(&BODY_SELECTOR)
        .next()
        .map(|body| {
            let mut raw = String::new();
            for node in body.descendants() {
                let Some(text) = node.value().as_text() else {
                    continue;
                };
                let hidden = node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .is_some_and(|el| NON_CONTENT_TAGS.contains(&el.name()))
                });
                if !hidden {
                    raw.push_str(text);
                    raw.push(' ');
                }
            }
            truncate_chars(&normalize_whitespace(&raw), MAX_BODY_CHARS)
        })
        .unwrap_or_default();

    ScrapedPage {
        title,
        description,
        body_text,
    }
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|el| normalize_whitespace(&el.text().collect::<String>()))
        .filter(|text| !text.is_empty())
}

pub fn normalize_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(word);
    }
    result
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
