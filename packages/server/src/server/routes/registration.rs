//! Registration ingestion and listing.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use crate::domains::registration::{NewRegistration, Registration};
use crate::kernel::event_hub::REGISTRATIONS_TOPIC;
use crate::server::app::AppState;
use crate::server::error::ApiError;

/// `POST /registro` — transactional write, then post-commit fan-out.
///
/// The broadcast and the welcome email are triggered here, after `submit`
/// returns a committed row, and exactly once per commit. Neither is awaited
/// by the response beyond the in-process publish.
pub async fn create_registration(
    State(state): State<AppState>,
    Json(payload): Json<NewRegistration>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    payload.validate().map_err(ApiError::Validation)?;

    let student_code = payload.student_code.clone();
    let registration = state.writer.submit(payload).await?;

    match serde_json::to_value(&registration) {
        Ok(data) => {
            state
                .event_hub
                .publish(REGISTRATIONS_TOPIC, "new-registration", data)
                .await;
        }
        // The row is committed; a broadcast problem must not fail the request
        Err(e) => tracing::error!(
            registration_id = %registration.id,
            error = %e,
            "failed to serialize registration for broadcast"
        ),
    }

    state
        .notifier
        .dispatch_welcome(registration.clone(), student_code);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Registro exitoso", "data": registration })),
    ))
}

/// `GET /registrations` — latest 100 plus total count.
pub async fn list_registrations(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let items = Registration::find_recent(100, &state.db_pool).await?;
    let count = Registration::count(&state.db_pool).await?;

    Ok(Json(json!({ "count": count, "items": items })))
}
