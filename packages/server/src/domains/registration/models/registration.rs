use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// One team's competition submission. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: Uuid,
    pub team_name: String,
    pub leader_name: String,
    pub email: String,
    pub phone: String,
    pub members: Vec<String>,
    pub project_name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Inbound registration payload (`POST /registro` body).
///
/// All fields default so that missing keys surface as one validation error
/// instead of a deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRegistration {
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub leader_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub project_name: String,
    /// Free-text category names; trimmed before resolving, empties skipped
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub description: String,
    /// Optional student code; used only for the welcome email addressing
    #[serde(default)]
    pub student_code: Option<String>,
}

impl NewRegistration {
    /// Check required fields before any persistence is attempted.
    pub fn validate(&self) -> Result<(), &'static str> {
        let required = [
            &self.team_name,
            &self.leader_name,
            &self.email,
            &self.phone,
            &self.project_name,
            &self.description,
        ];
        if required.iter().any(|field| field.trim().is_empty()) || self.members.is_empty() {
            return Err("Faltan campos obligatorios");
        }
        Ok(())
    }
}

impl Registration {
    /// Insert a registration row inside the caller's transaction.
    /// Fields are stored verbatim; categories are linked separately.
    pub async fn create(new: &NewRegistration, conn: &mut PgConnection) -> Result<Self> {
        sqlx::query_as::<_, Registration>(
            r#"
            INSERT INTO registrations (team_name, leader_name, email, phone, members, project_name, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&new.team_name)
        .bind(&new.leader_name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.members)
        .bind(&new.project_name)
        .bind(&new.description)
        .fetch_one(&mut *conn)
        .await
        .map_err(Into::into)
    }

    /// Latest registrations, newest first.
    pub async fn find_recent(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM registrations")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
