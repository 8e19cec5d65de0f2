use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// A named tag a registration can be associated with, many-to-many.
///
/// Names are stored trimmed and compared case-sensitively. Categories are
/// created lazily on first use and never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Link row between a registration and a category.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CategoryLink {
    pub registration_id: Uuid,
    pub category_id: Uuid,
}

impl Category {
    /// Get-or-create by name in one atomic statement.
    ///
    /// The no-op DO UPDATE makes the insert return the existing id on
    /// conflict, so concurrent first-time creates of the same name converge
    /// on a single row with the unique constraint as the backstop.
    pub async fn resolve_or_create(name: &str, conn: &mut PgConnection) -> Result<Uuid> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO categories (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            "#,
        )
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;
        Ok(id)
    }

    pub async fn find_by_name(name: &str, pool: &PgPool) -> Result<Option<Self>> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await?;
        Ok(category)
    }

    /// Categories linked to a registration, in name order.
    pub async fn find_for_registration(registration_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT c.*
            FROM categories c
            INNER JOIN registration_categories rc ON rc.category_id = c.id
            WHERE rc.registration_id = $1
            ORDER BY c.name
            "#,
        )
        .bind(registration_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}

impl CategoryLink {
    /// Link a registration to a category inside the caller's transaction.
    /// An already-existing link is a silent no-op.
    pub async fn create(
        registration_id: Uuid,
        category_id: Uuid,
        conn: &mut PgConnection,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO registration_categories (registration_id, category_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(registration_id)
        .bind(category_id)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM registration_categories")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
