use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::llm::TextGenerator;
use crate::models::{GenerationResult, Post, ScrapedInfo, ScrapedPage};
use crate::options::GenerationOptions;
use crate::prompt::build_prompt;
use crate::scraper::{fetch_and_extract, validate_url, PageFetcher};

/// Turns a page URL into social media posts: fetch, extract, prompt, parse.
pub struct PostGenerator {
    fetcher: Arc<dyn PageFetcher>,
    model: Arc<dyn TextGenerator>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelReply {
    #[serde(default)]
    scraped_summary: Option<String>,
    posts: Vec<ModelPost>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelPost {
    #[serde(default)]
    variation: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    engagement_score: Option<serde_json::Value>,
    #[serde(default)]
    image_prompt: Option<String>,
}

/// Inputs for regenerating one post of an existing list.
#[derive(Debug, Clone, PartialEq)]
pub struct RegenerationPlan {
    pub index: usize,
    pub options: GenerationOptions,
    pub existing_posts: Vec<Post>,
}

impl PostGenerator {
    pub fn new(fetcher: Arc<dyn PageFetcher>, model: Arc<dyn TextGenerator>) -> Self {
        PostGenerator { fetcher, model }
    }

    pub async fn scrape_and_generate(
        &self,
        url: &str,
        existing_posts: &[Post],
        options: GenerationOptions,
    ) -> Result<GenerationResult> {
        let url = validate_url(url)?;
        let options = options.normalized()?;
        self.model.ensure_ready()?;

        let page = fetch_and_extract(self.fetcher.as_ref(), url).await?;
        self.generate_posts(&page, &options, existing_posts).await
    }

    pub async fn generate_posts(
        &self,
        page: &ScrapedPage,
        options: &GenerationOptions,
        existing_posts: &[Post],
    ) -> Result<GenerationResult> {
        let prompt = build_prompt(page, options, existing_posts);
        info!(
            prompt_chars = prompt.len(),
            variations = options.post_variations.len(),
            "Calling model"
        );

        let llm_start = std::time::Instant::now();
        let reply = self.model.generate_json(&prompt).await?;
        info!(elapsed = ?llm_start.elapsed(), reply_chars = reply.len(), "Model replied");

        let (summary, posts) = parse_reply(&reply, options)?;
        if posts.len() != options.post_variations.len() {
            warn!(
                requested = options.post_variations.len(),
                returned = posts.len(),
                "Model returned a different number of posts than requested"
            );
        }

        Ok(GenerationResult {
            scraped_info: ScrapedInfo {
                title: page.title.clone(),
                description: page.description.clone(),
                summary,
            },
            posts,
            generated_at: Utc::now(),
        })
    }

    /// Replaces the post `post_id` with a freshly generated one of the same
    /// variation. The returned result carries the full list, other posts untouched.
    pub async fn regenerate_post(
        &self,
        url: &str,
        posts: &[Post],
        post_id: &str,
        options: GenerationOptions,
    ) -> Result<GenerationResult> {
        let plan = plan_regeneration(posts, post_id, &options)?;
        info!(post_id, variation = %posts[plan.index].variation, "Regenerating post");

        let mut result = self
            .scrape_and_generate(url, &plan.existing_posts, plan.options)
            .await?;
        let replacement = result.posts.drain(..).next().ok_or_else(|| {
            AppError::ResponseParseError("the model returned no post to replace the old one".to_string())
        })?;

        let mut updated = posts.to_vec();
        splice_post(&mut updated, post_id, replacement);
        result.posts = updated;
        Ok(result)
    }
}

pub fn plan_regeneration(
    posts: &[Post],
    post_id: &str,
    options: &GenerationOptions,
) -> Result<RegenerationPlan> {
    let index = posts
        .iter()
        .position(|post| post.id == post_id)
        .ok_or_else(|| AppError::InvalidInput(format!("No post with id '{}' to regenerate.", post_id)))?;

    Ok(RegenerationPlan {
        index,
        options: options.narrowed_to(&posts[index].variation),
        existing_posts: posts
            .iter()
            .filter(|post| post.id != post_id)
            .cloned()
            .collect(),
    })
}

/// Puts `replacement` where the post with `post_id` was. Returns false when no
/// post has that id.
pub fn splice_post(posts: &mut [Post], post_id: &str, replacement: Post) -> bool {
    match posts.iter_mut().find(|post| post.id == post_id) {
        Some(slot) => {
            *slot = replacement;
            true
        }
        None => false,
    }
}

/// Parses the model's JSON reply into posts with fresh ids.
pub fn parse_reply(reply: &str, options: &GenerationOptions) -> Result<(Option<String>, Vec<Post>)> {
    let parsed: ModelReply = serde_json::from_str(strip_code_fence(reply))
        .map_err(|e| AppError::ResponseParseError(e.to_string()))?;

    let posts = parsed
        .posts
        .into_iter()
        .enumerate()
        .filter_map(|(i, raw)| {
            let content = raw.content.map(|c| c.trim().to_string()).filter(|c| !c.is_empty())?;
            let variation = raw
                .variation
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .or_else(|| options.post_variations.get(i).cloned())
                .unwrap_or_default();
            let image_prompt = if options.include_image_prompt {
                raw.image_prompt.map(|p| p.trim().to_string()).filter(|p| !p.is_empty())
            } else {
                None
            };

            Some(Post {
                id: Uuid::new_v4().to_string(),
                variation,
                content,
                engagement_score: raw.engagement_score.as_ref().and_then(engagement_score),
                image_prompt,
            })
        })
        .collect();

    let summary = parsed
        .scraped_summary
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Ok((summary, posts))
}

fn engagement_score(value: &serde_json::Value) -> Option<u8> {
    let score = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok()?,
        _ => return None,
    };
    if !score.is_finite() {
        return None;
    }
    Some(score.round().clamp(1.0, 100.0) as u8)
}

/// Models sometimes wrap JSON in a Markdown fence even when asked not to.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
