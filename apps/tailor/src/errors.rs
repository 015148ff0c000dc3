use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use thiserror::Error;

use crate::delivery::DeliveryError;
use crate::layout::SinkError;
use crate::llm_client::backend::ErrorBody;
use crate::llm_client::CompletionError;
use crate::settings::SettingsError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant becomes `{ "error": <one line>, "details"?: <provider feedback> }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    #[error("Render error: {0}")]
    Render(#[from] SinkError),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Status code and user-facing message. Internal detail is logged here and
    /// never returned.
    fn parts(&self) -> (StatusCode, String, Option<Value>) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Completion(e) => match e {
                CompletionError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
                CompletionError::Service { details, .. } => {
                    tracing::error!("Generation failed: {e}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        e.user_message(),
                        details.clone(),
                    )
                }
                CompletionError::Network(_) => {
                    tracing::error!("{e}");
                    (StatusCode::BAD_GATEWAY, e.user_message(), None)
                }
            },
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PDF generation failed.".to_string(),
                    None,
                )
            }
            AppError::Delivery(e) => {
                tracing::error!("Delivery error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.user_message(), None)
            }
            AppError::Settings(e) => {
                tracing::error!("Settings error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error accessing stored settings.".to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                    None,
                )
            }
        }
    }
}

/// Malformed bodies (bad JSON, wrong content type, wrong field type) answer
/// with the same `{error}` shape as every other failure.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(status = %rejection.status(), "Rejected request body: {rejection}");
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = self.parts();
        (status, Json(ErrorBody { error, details })).into_response()
    }
}
