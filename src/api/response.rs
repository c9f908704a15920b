use serde::Serialize;
use axum::Json;
use axum::http::StatusCode;

use crate::error::AppError;

/// Either `{ "result": ... }` or `{ "error": "..." }`, never both.
#[derive(Serialize)]
#[serde(untagged)]
pub enum ActionResponse<T> {
    Success { result: T },
    Failure { error: String },
}

pub fn success<T: Serialize>(data: T) -> (StatusCode, Json<ActionResponse<T>>) {
    (StatusCode::OK, Json(ActionResponse::Success { result: data }))
}

pub fn error<T>(err: &AppError) -> (StatusCode, Json<ActionResponse<T>>) {
    (
        err.status_code(),
        Json(ActionResponse::Failure {
            error: err.to_string(),
        }),
    )
}
