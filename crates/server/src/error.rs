use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use sharpness_core::AnalysisError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    EngineUnavailable(String),

    #[error("{0}")]
    EngineFailed(String),
}

impl From<AnalysisError> for AppError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::InvalidFen(_) => AppError::BadRequest(e.to_string()),
            AnalysisError::EngineUnavailable(_) => AppError::EngineUnavailable(e.to_string()),
            AnalysisError::Engine(_) => AppError::EngineFailed(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::EngineUnavailable(msg) => {
                tracing::error!("{msg}");
                (StatusCode::SERVICE_UNAVAILABLE, msg.clone())
            }
            AppError::EngineFailed(msg) => {
                tracing::error!("{msg}");
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
        };

        // Match FastAPI error format: {"detail": "message"}
        (status, Json(json!({ "detail": message }))).into_response()
    }
}
