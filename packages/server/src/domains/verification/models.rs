use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A token-bearing record tracking one attempt to verify a student's
/// institutional affiliation by email.
///
/// Created unverified; a later confirmation step flips `verified`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    pub id: Uuid,
    pub registration_id: Option<Uuid>,
    pub student_code: String,
    pub student_email: String,
    pub token: String,
    pub sent_at: Option<DateTime<Utc>>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl VerificationRequest {
    /// Persist a new, unverified request. The token's uniqueness is enforced
    /// by the database.
    pub async fn create(
        student_code: &str,
        student_email: &str,
        token: &str,
        registration_id: Option<Uuid>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, VerificationRequest>(
            r#"
            INSERT INTO verification_requests (student_code, student_email, token, registration_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(student_code)
        .bind(student_email)
        .bind(token)
        .bind(registration_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Stamp the send time after the verification email went out.
    pub async fn mark_sent(id: Uuid, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, VerificationRequest>(
            "UPDATE verification_requests SET sent_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_token(token: &str, pool: &PgPool) -> Result<Option<Self>> {
        let request = sqlx::query_as::<_, VerificationRequest>(
            "SELECT * FROM verification_requests WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(pool)
        .await?;
        Ok(request)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM verification_requests")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
