mod common;

use std::collections::HashSet;
use std::sync::Arc;

use common::{StubModel, StubProxy, HELLO_PAGE};
use social_post_generator::error::AppError;
use social_post_generator::generator::PostGenerator;
use social_post_generator::models::Post;
use social_post_generator::options::GenerationOptions;

fn options(variations: &[&str]) -> GenerationOptions {
    GenerationOptions::new(variations.iter().map(|v| v.to_string()).collect())
}

fn generator(proxy: &Arc<StubProxy>, model: &Arc<StubModel>) -> PostGenerator {
    PostGenerator::new(proxy.clone(), model.clone())
}

#[tokio::test]
async fn end_to_end_with_stubbed_services() {
    let proxy = Arc::new(StubProxy::page(HELLO_PAGE));
    let model = Arc::new(StubModel::replying(r#"{"posts":[{"variation":"hook","content":"Hi!"}]}"#));

    let result = generator(&proxy, &model)
        .scrape_and_generate("https://example.com", &[], options(&["hook"]))
        .await
        .unwrap();

    assert_eq!(result.scraped_info.title, "T");
    assert_eq!(result.scraped_info.description, "No description found");
    assert_eq!(result.posts.len(), 1);
    assert_eq!(result.posts[0].content, "Hi!");
    assert_eq!(result.posts[0].variation, "hook");
    assert!(!result.posts[0].id.is_empty());

    let prompts = model.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Body Content Preview: Hello world"));
}

#[tokio::test]
async fn invalid_urls_never_reach_the_network() {
    let proxy = Arc::new(StubProxy::page(HELLO_PAGE));
    let model = Arc::new(StubModel::replying("{}"));
    let generator = generator(&proxy, &model);

    for url in ["", "example.com", "ftp://example.com/file", "www.example.com"] {
        let err = generator
            .scrape_and_generate(url, &[], options(&["hook"]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)), "{url:?} gave {err:?}");
    }
    assert_eq!(proxy.calls(), 0);
    assert!(model.prompts().is_empty());
}

#[tokio::test]
async fn empty_variation_list_is_rejected_before_fetching() {
    let proxy = Arc::new(StubProxy::page(HELLO_PAGE));
    let model = Arc::new(StubModel::replying("{}"));

    let err = generator(&proxy, &model)
        .scrape_and_generate("https://example.com", &[], options(&[]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
    assert_eq!(proxy.calls(), 0);
}

#[tokio::test]
async fn missing_credential_fails_before_fetching() {
    let proxy = Arc::new(StubProxy::page(HELLO_PAGE));
    let model = Arc::new(StubModel::without_credential());

    let err = generator(&proxy, &model)
        .scrape_and_generate("https://example.com", &[], options(&["hook"]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ConfigError(_)));
    assert_eq!(proxy.calls(), 0);
}

#[tokio::test]
async fn one_post_per_requested_variation_with_unique_ids() {
    let proxy = Arc::new(StubProxy::page(HELLO_PAGE));
    let model = Arc::new(StubModel::replying(
        r#"{"posts":[
            {"variation":"hook","content":"a","id":"same"},
            {"variation":"summary","content":"b","id":"same"},
            {"variation":"question","content":"c?"}
        ]}"#,
    ));

    let result = generator(&proxy, &model)
        .scrape_and_generate("https://example.com", &[], options(&["hook", "summary", "question"]))
        .await
        .unwrap();

    let variations: Vec<&str> = result.posts.iter().map(|p| p.variation.as_str()).collect();
    assert_eq!(variations, vec!["hook", "summary", "question"]);
    let ids: HashSet<&str> = result.posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids.len(), 3);
    assert!(ids.iter().all(|id| !id.is_empty() && *id != "same"));
}

#[tokio::test]
async fn proxy_reported_403_surfaces_scraping_protection() {
    let proxy = Arc::new(StubProxy::new(
        serde_json::json!({ "status": { "http_code": 403 }, "contents": null }),
    ));
    let model = Arc::new(StubModel::replying("{}"));

    let err = generator(&proxy, &model)
        .scrape_and_generate("https://example.com", &[], options(&["hook"]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    assert!(err.to_string().contains("protected and cannot be scraped"));
    assert!(model.prompts().is_empty());
}

#[tokio::test]
async fn proxy_reported_failure_carries_status() {
    let proxy = Arc::new(StubProxy::new(
        serde_json::json!({ "status": { "http_code": 500 }, "contents": "" }),
    ));
    let model = Arc::new(StubModel::replying("{}"));

    let err = generator(&proxy, &model)
        .scrape_and_generate("https://example.com", &[], options(&["hook"]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::FetchFailed(500)));
    assert!(err.to_string().contains("Status: 500"));
}

#[tokio::test]
async fn unparsable_reply_is_reported_as_parse_failure() {
    let proxy = Arc::new(StubProxy::page(HELLO_PAGE));
    let model = Arc::new(StubModel::replying("Here are some great posts for you!"));

    let err = generator(&proxy, &model)
        .scrape_and_generate("https://example.com", &[], options(&["hook"]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ResponseParseError(_)));
    let msg = err.to_string();
    assert!(msg.contains("parse the AI response"));
    assert!(!msg.contains("Network Error"));
}

#[tokio::test]
async fn long_bodies_are_truncated_before_prompting() {
    let body = "b".repeat(10_000);
    let html = format!("<html><title>Long</title><body>{body}</body></html>");
    let proxy = Arc::new(StubProxy::page(&html));
    let model = Arc::new(StubModel::replying(r#"{"posts":[{"variation":"hook","content":"x"}]}"#));

    generator(&proxy, &model)
        .scrape_and_generate("https://example.com", &[], options(&["hook"]))
        .await
        .unwrap();

    let prompt = &model.prompts()[0];
    let preview = prompt
        .split("Body Content Preview: ")
        .nth(1)
        .unwrap()
        .trim_end();
    assert_eq!(preview.chars().count(), 6000);
    assert!(!prompt.contains(&"b".repeat(6001)));
}

#[tokio::test]
async fn existing_posts_are_listed_in_the_prompt() {
    let proxy = Arc::new(StubProxy::page(HELLO_PAGE));
    let model = Arc::new(StubModel::replying(r#"{"posts":[{"variation":"hook","content":"new"}]}"#));
    let existing = vec![Post::new("hook", "An older hook")];

    generator(&proxy, &model)
        .scrape_and_generate("https://example.com", &existing, options(&["hook"]))
        .await
        .unwrap();

    assert!(model.prompts()[0].contains("   - An older hook"));
}

#[tokio::test]
async fn regenerating_replaces_only_the_target_post() {
    let proxy = Arc::new(StubProxy::page(HELLO_PAGE));
    let model = Arc::new(StubModel::replying(
        r#"{"posts":[{"variation":"summary","content":"A brand new summary"}]}"#,
    ));
    let posts = vec![
        Post::new("hook", "Old hook"),
        Post::new("summary", "Old summary"),
        Post::new("question", "Old question?"),
    ];
    let target = posts[1].id.clone();

    let result = generator(&proxy, &model)
        .regenerate_post(
            "https://example.com",
            &posts,
            &target,
            options(&["hook", "summary", "question"]),
        )
        .await
        .unwrap();

    let prompt = &model.prompts()[0];
    assert!(prompt.contains("following 1 requested variation,"));
    assert!(prompt.contains("\"summary\" (Key Summary)"));
    assert!(!prompt.contains("\"hook\" (Intriguing Hook)"));
    assert!(prompt.contains("   - Old hook"));
    assert!(prompt.contains("   - Old question?"));
    assert!(!prompt.contains("Old summary"));

    assert_eq!(result.posts.len(), 3);
    assert_eq!(result.posts[0], posts[0]);
    assert_eq!(result.posts[2], posts[2]);
    assert_eq!(result.posts[1].content, "A brand new summary");
    assert_ne!(result.posts[1].id, target);
}

#[tokio::test]
async fn regenerating_with_empty_reply_fails_without_partial_result() {
    let proxy = Arc::new(StubProxy::page(HELLO_PAGE));
    let model = Arc::new(StubModel::replying(r#"{"posts":[]}"#));
    let posts = vec![Post::new("hook", "Old hook")];

    let err = generator(&proxy, &model)
        .regenerate_post("https://example.com", &posts, &posts[0].id, options(&["hook"]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ResponseParseError(_)));
}
