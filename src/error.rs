use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    http::StatusCode,
};

use crate::api::response;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("The request timed out. The target website or the AI model might be slow.")]
    Timeout,

    #[error("Failed to fetch URL. Status: {0}. The site may be blocking scrapers.")]
    FetchFailed(u16),

    #[error("Network Error: 403. The content source is likely protected and cannot be scraped.")]
    Forbidden,

    #[error("Server configuration error: {0}")]
    ConfigError(String),

    #[error("API or Network Error: {0}. Please check your API key and network connection.")]
    UpstreamError(u16),

    #[error("Failed to parse the AI response: {0}. The model's output was not valid JSON (this is not a network problem).")]
    ResponseParseError(String),

    #[error("{0}")]
    Unknown(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::FetchFailed(_)
            | AppError::Forbidden
            | AppError::UpstreamError(_)
            | AppError::ResponseParseError(_) => StatusCode::BAD_GATEWAY,
            AppError::ConfigError(_) | AppError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        response::error::<()>(&self).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return AppError::Timeout;
        }
        // The request URL may carry the API key.
        AppError::Unknown(err.without_url().to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
