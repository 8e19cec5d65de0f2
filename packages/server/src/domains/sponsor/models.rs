use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// An event sponsor submission.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sponsor {
    pub id: Uuid,
    pub name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Inbound sponsor payload (`POST /sponsors` body).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSponsor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl NewSponsor {
    pub fn validate(&self) -> Result<(), &'static str> {
        let required = [&self.name, &self.contact_name, &self.email];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err("Faltan campos obligatorios");
        }
        Ok(())
    }
}

impl Sponsor {
    pub async fn create(new: &NewSponsor, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Sponsor>(
            r#"
            INSERT INTO sponsors (name, contact_name, email, phone, website, message)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&new.name)
        .bind(&new.contact_name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.website)
        .bind(&new.message)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Latest sponsors, newest first.
    pub async fn find_recent(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Sponsor>("SELECT * FROM sponsors ORDER BY created_at DESC LIMIT $1")
            .bind(limit)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }
}
