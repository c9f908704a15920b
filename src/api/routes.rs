use axum::{
    routing::{get, post},
    Router,
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::api::models::{GenerateRequest, OptionsCatalog, RegenerateRequest};
use crate::api::response::{self, ActionResponse};
use crate::models::GenerationResult;
use crate::AppState;

/// Overall bound on one request, on top of the per-call client timeouts.
const HANDLER_TIMEOUT: Duration = Duration::from_secs(90);

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/options", get(options_handler))
        .route("/api/generate", post(generate_handler))
        .route("/api/regenerate", post(regenerate_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn options_handler() -> impl IntoResponse {
    response::success(OptionsCatalog::current())
}

async fn generate_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ActionResponse<GenerationResult>>)> {
    let Json(req) = payload.inspect_err(|rejection| warn!(error = %rejection, "Rejected generation request"))?;
    info!(url = %req.url, existing = req.existing_posts.len(), "Processing generation request");
    let outcome = with_timeout(
        state
            .generator
            .scrape_and_generate(&req.url, &req.existing_posts, req.options),
    )
    .await;
    respond(&req.url, outcome)
}

async fn regenerate_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegenerateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ActionResponse<GenerationResult>>)> {
    let Json(req) = payload.inspect_err(|rejection| warn!(error = %rejection, "Rejected regeneration request"))?;
    info!(url = %req.url, post_id = %req.post_id, "Processing regeneration request");
    let outcome = with_timeout(
        state
            .generator
            .regenerate_post(&req.url, &req.posts, &req.post_id, req.options),
    )
    .await;
    respond(&req.url, outcome)
}

async fn with_timeout<F>(work: F) -> Result<GenerationResult>
where
    F: std::future::Future<Output = Result<GenerationResult>>,
{
    let start_time = std::time::Instant::now();
    let result = tokio::time::timeout(HANDLER_TIMEOUT, work).await;
    info!(elapsed = ?start_time.elapsed(), "Request processing finished");

    result.unwrap_or(Err(AppError::Timeout))
}

fn respond(
    url: &str,
    outcome: Result<GenerationResult>,
) -> Result<(StatusCode, Json<ActionResponse<GenerationResult>>)> {
    match outcome {
        Ok(result) => {
            info!(url, posts = result.posts.len(), "Successfully generated posts");
            Ok(response::success(result))
        }
        Err(err) => {
            warn!(url, error = %err, "Generation failed");
            Err(err)
        }
    }
}
