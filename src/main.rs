use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use social_post_generator::{
    config::Config,
    api::routes::create_router,
    generator::PostGenerator,
    llm::GeminiClient,
    scraper::ProxyFetcher,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("social_post_generator=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = Config::load()?;
    let server_addr = config.server_addr;
    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; generation requests will fail until it is");
    }

    let fetcher = ProxyFetcher::new(config.proxy_url.clone(), config.fetch_timeout)?;
    let model = GeminiClient::from_config(&config)?;

    // Create application state
    let app_state = AppState {
        generator: Arc::new(PostGenerator::new(Arc::new(fetcher), Arc::new(model))),
    };

    // Build the router with routes
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    info!(%server_addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
