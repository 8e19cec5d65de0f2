//! HTTP error mapping.
//!
//! Validation problems echo their message to the client; everything else is
//! logged with its full cause chain server-side and surfaced as a generic
//! message, so schema and constraint details never leak.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::domains::registration::WriteError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Client-fault request problems (missing required fields).
    #[error("{0}")]
    Validation(&'static str),

    /// Anything that failed on the server side.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<WriteError> for ApiError {
    fn from(error: WriteError) -> Self {
        ApiError::Internal(anyhow::Error::new(error))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": message })),
            )
                .into_response(),
            ApiError::Internal(error) => {
                tracing::error!(error = %format!("{error:#}"), "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Error en el servidor" })),
                )
                    .into_response()
            }
        }
    }
}
