pub mod api;
pub mod config;
pub mod error;
pub mod generator;
pub mod llm;
pub mod models;
pub mod options;
pub mod prompt;
pub mod scraper;

use std::sync::Arc;
use generator::PostGenerator;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<PostGenerator>,
}
