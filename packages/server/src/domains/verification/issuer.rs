//! Verification issuance: persist a tokened request, then email the link.
//!
//! Unlike the welcome path, the email send here is awaited and a failure
//! fails the whole operation. The record is persisted before the send, so on
//! a send failure it remains in the database unsent (`sent_at` null). That
//! asymmetry is intentional product behavior.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use super::models::VerificationRequest;
use crate::kernel::mailer::{Mailer, OutboundEmail};

const VERIFICATION_SUBJECT: &str = "Verifica tu correo institucional - Hult Prize UTP";

/// Issues verification tokens and sends the corresponding emails.
#[derive(Clone)]
pub struct VerificationIssuer {
    pool: PgPool,
    mailer: Arc<dyn Mailer>,
    frontend_url: String,
}

impl VerificationIssuer {
    pub fn new(pool: PgPool, mailer: Arc<dyn Mailer>, frontend_url: String) -> Self {
        Self {
            pool,
            mailer,
            frontend_url,
        }
    }

    /// Generate a unique token, persist the request, and email the
    /// verification link. Returns the persisted record with `sent_at` set.
    pub async fn issue(
        &self,
        student_code: &str,
        student_email: &str,
        registration_id: Option<Uuid>,
    ) -> Result<VerificationRequest> {
        let token = generate_token();
        let request = VerificationRequest::create(
            student_code,
            student_email,
            &token,
            registration_id,
            &self.pool,
        )
        .await?;

        let link = verification_link(&self.frontend_url, &token);
        self.mailer
            .send(&OutboundEmail {
                to: vec![student_email.to_string()],
                subject: VERIFICATION_SUBJECT.to_string(),
                html: Some(format!(
                    "<p>Para verificar tu correo institucional haz clic en el enlace:</p>\
                     <p><a href=\"{link}\">{link}</a></p>"
                )),
                text: Some(format!(
                    "Para verificar tu correo institucional abre este enlace: {link}"
                )),
            })
            .await
            .context("verification email send failed")?;

        let request = VerificationRequest::mark_sent(request.id, &self.pool).await?;
        Ok(request)
    }
}

/// Build the verification link embedding the token.
pub fn verification_link(frontend_url: &str, token: &str) -> String {
    format!(
        "{}/verify-student?token={}",
        frontend_url.trim_end_matches('/'),
        token
    )
}

/// Two v4 UUIDs' worth of CSPRNG-backed randomness (244 random bits),
/// hex-encoded to 64 characters.
pub fn generate_token() -> String {
    format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}
