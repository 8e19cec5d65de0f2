//! Transactional registration writer.
//!
//! One submission is one transaction on one pooled connection: the
//! registration row, its category upserts, and its link rows either all
//! commit or none persist. Broadcast and email are deliberately NOT
//! triggered here — the caller fans them out after a successful commit, so
//! the write path stays independently testable.

use anyhow::Context;
use sqlx::PgPool;
use thiserror::Error;

use super::models::{Category, CategoryLink, NewRegistration, Registration};

/// A persistence failure anywhere in the transactional write.
///
/// Carries the underlying cause for server-side logging; the HTTP layer maps
/// this to a generic client message without schema details.
#[derive(Debug, Error)]
#[error("registration write failed")]
pub struct WriteError(#[from] anyhow::Error);

/// Orchestrates the atomic multi-table registration write.
#[derive(Clone)]
pub struct RegistrationWriter {
    pool: PgPool,
}

impl RegistrationWriter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Write one registration and its category links atomically.
    ///
    /// Category names are taken in supplied order; each is trimmed, empties
    /// are skipped, and duplicates within the list are tolerated (the link
    /// insert is idempotent). Any failure rolls the whole transaction back.
    pub async fn submit(&self, new: NewRegistration) -> Result<Registration, WriteError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("failed to begin transaction")?;

        let registration = Registration::create(&new, &mut *tx).await?;

        for raw_name in &new.category {
            let name = raw_name.trim();
            if name.is_empty() {
                continue;
            }
            let category_id = Category::resolve_or_create(name, &mut *tx).await?;
            CategoryLink::create(registration.id, category_id, &mut *tx).await?;
        }

        tx.commit().await.context("failed to commit transaction")?;

        Ok(registration)
    }
}
