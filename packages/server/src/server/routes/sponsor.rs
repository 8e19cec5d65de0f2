//! Sponsor submissions and listing.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use crate::domains::sponsor::{NewSponsor, Sponsor};
use crate::kernel::event_hub::SPONSORS_TOPIC;
use crate::server::app::AppState;
use crate::server::error::ApiError;

/// `POST /sponsors` — validated create with a `new-sponsor` broadcast.
pub async fn create_sponsor(
    State(state): State<AppState>,
    Json(payload): Json<NewSponsor>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    payload.validate().map_err(ApiError::Validation)?;

    let sponsor = Sponsor::create(&payload, &state.db_pool).await?;

    match serde_json::to_value(&sponsor) {
        Ok(data) => {
            state
                .event_hub
                .publish(SPONSORS_TOPIC, "new-sponsor", data)
                .await;
        }
        Err(e) => tracing::error!(
            sponsor_id = %sponsor.id,
            error = %e,
            "failed to serialize sponsor for broadcast"
        ),
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Sponsor creado", "data": sponsor })),
    ))
}

/// `GET /sponsors` — latest 100.
pub async fn list_sponsors(
    State(state): State<AppState>,
) -> Result<Json<Vec<Sponsor>>, ApiError> {
    let sponsors = Sponsor::find_recent(100, &state.db_pool).await?;
    Ok(Json(sponsors))
}
