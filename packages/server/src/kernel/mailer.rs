//! Outbound email behind a `Mailer` trait.
//!
//! The production implementation talks to a transactional mail HTTP API
//! (Brevo-compatible: api-key header, sender/to/subject/htmlContent body).
//! Tests substitute their own `Mailer` implementations; nothing else in the
//! crate knows how mail actually leaves the process.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Serialize;

/// A rendered email ready for the transport.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: Vec<String>,
    pub subject: String,
    pub html: Option<String>,
    pub text: Option<String>,
}

/// Mail transport seam. Send failures carry the transport cause.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<()>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MailAddress<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody<'a> {
    sender: MailAddress<'a>,
    to: Vec<MailAddress<'a>>,
    subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html_content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_content: Option<&'a str>,
}

/// Mailer backed by a transactional mail HTTP API.
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from_email: String,
    from_name: Option<String>,
}

impl HttpMailer {
    pub fn new(
        api_url: String,
        api_key: String,
        from_email: String,
        from_name: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            from_email,
            from_name,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<()> {
        let body = SendEmailBody {
            sender: MailAddress {
                email: &self.from_email,
                name: self.from_name.as_deref(),
            },
            to: email
                .to
                .iter()
                .map(|address| MailAddress {
                    email: address,
                    name: None,
                })
                .collect(),
            subject: &email.subject,
            html_content: email.html.as_deref(),
            text_content: email.text.as_deref(),
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("api-key", &self.api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .context("mail API request failed")?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = response.text().await.unwrap_or_default();
        Err(anyhow!("mail API rejected send (status={status}): {detail}"))
    }
}
