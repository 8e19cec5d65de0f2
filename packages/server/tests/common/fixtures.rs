//! Test doubles and payload builders shared across the integration suite.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;

use registro_core::domains::registration::NewRegistration;
use registro_core::kernel::{Mailer, OutboundEmail};

/// Mailer that records every send for later assertions.
pub struct RecordingMailer {
    sent: Mutex<Vec<OutboundEmail>>,
}

impl RecordingMailer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }

    /// Poll until `n` emails have been sent or the deadline passes.
    pub async fn wait_for_sends(&self, n: usize, timeout: Duration) -> Vec<OutboundEmail> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let sent = self.sent();
            if sent.len() >= n {
                return sent;
            }
            if tokio::time::Instant::now() >= deadline {
                panic!("expected {} emails, saw {} before timeout", n, sent.len());
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<()> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Mailer whose every send fails.
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _email: &OutboundEmail) -> Result<()> {
        Err(anyhow!("smtp relay unreachable"))
    }
}

/// Mailer that sleeps before accepting, to expose any blocking send path.
pub struct SlowMailer {
    pub delay: Duration,
}

#[async_trait]
impl Mailer for SlowMailer {
    async fn send(&self, _email: &OutboundEmail) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// JSON body for `POST /registro`.
pub fn registration_payload(team_name: &str, categories: &[&str]) -> serde_json::Value {
    json!({
        "teamName": team_name,
        "leaderName": "Ana",
        "email": "ana@x.com",
        "phone": "111",
        "members": ["Ana"],
        "projectName": "P1",
        "category": categories,
        "description": "d",
    })
}

/// Direct payload struct for exercising the writer without HTTP.
pub fn new_registration(team_name: &str, categories: &[&str]) -> NewRegistration {
    NewRegistration {
        team_name: team_name.to_string(),
        leader_name: "Ana".to_string(),
        email: "ana@x.com".to_string(),
        phone: "111".to_string(),
        members: vec!["Ana".to_string()],
        project_name: "P1".to_string(),
        category: categories.iter().map(|s| s.to_string()).collect(),
        description: "d".to_string(),
        student_code: None,
    }
}
