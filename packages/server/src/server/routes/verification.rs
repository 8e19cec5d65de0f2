//! Student verification issuance.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyStudentRequest {
    #[serde(default)]
    pub student_code: String,
    #[serde(default)]
    pub student_email: String,
    #[serde(default)]
    pub registro_id: Option<Uuid>,
}

/// `POST /verify-student` — persist a verification request and email the
/// link. A send failure fails the response even though the record is already
/// persisted (it remains unsent, `sent_at` null).
pub async fn verify_student(
    State(state): State<AppState>,
    Json(payload): Json<VerifyStudentRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    if payload.student_code.trim().is_empty() || payload.student_email.trim().is_empty() {
        return Err(ApiError::Validation("Faltan campos obligatorios"));
    }

    let request = state
        .issuer
        .issue(
            payload.student_code.trim(),
            payload.student_email.trim(),
            payload.registro_id,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Verificación enviada", "data": request })),
    ))
}
