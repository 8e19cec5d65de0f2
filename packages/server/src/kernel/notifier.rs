//! Detached notification dispatcher.
//!
//! Welcome emails are handed off through a bounded channel to a dedicated
//! background task, so the registration response never waits on the mail
//! transport. Failures on this path are logged for operators and never
//! surface to the request that triggered them.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::domains::registration::models::Registration;
use crate::kernel::mailer::{Mailer, OutboundEmail};

const QUEUE_CAPACITY: usize = 256;

const WELCOME_SUBJECT: &str = "Bienvenido a Hult Prize UTP";

const WELCOME_TEXT: &str = "¡Bienvenido a Hult Prize UTP! Gracias por registrarte. \
     Estaremos en contacto con más información.";

const WELCOME_HTML_FALLBACK: &str = "<p><strong>¡Bienvenido a Hult Prize UTP!</strong></p>\
     <p>Gracias por registrarte. Estaremos en contacto con más información.</p>";

/// Settings for rendering and addressing welcome emails.
#[derive(Debug, Clone)]
pub struct WelcomeSettings {
    pub frontend_url: String,
    /// Domain for the derived institutional address (`<code>@<domain>`)
    pub student_email_domain: String,
    /// HTML template with {{leaderName}}, {{teamName}}, {{projectName}},
    /// {{frontendUrl}} placeholders; plain-text fallback when absent
    pub template: Option<String>,
}

/// Work items accepted by the dispatcher task.
#[derive(Debug)]
pub enum Notification {
    Welcome {
        registration: Registration,
        student_code: Option<String>,
    },
}

/// Handle for enqueueing notifications onto the background dispatcher.
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::Sender<Notification>,
}

impl Notifier {
    /// Spawn the dispatcher task and return a handle to it.
    pub fn spawn(mailer: Arc<dyn Mailer>, settings: WelcomeSettings) -> Self {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        tokio::spawn(run(rx, mailer, settings));
        Self { tx }
    }

    /// Enqueue a welcome email for a committed registration.
    ///
    /// Returns immediately; a full or closed queue drops the notification
    /// with a warning (delivery is best-effort, no retry).
    pub fn dispatch_welcome(&self, registration: Registration, student_code: Option<String>) {
        let registration_id = registration.id;
        if let Err(e) = self.tx.try_send(Notification::Welcome {
            registration,
            student_code,
        }) {
            warn!(
                registration_id = %registration_id,
                error = %e,
                "welcome email dropped, notification queue unavailable"
            );
        }
    }
}

async fn run(
    mut rx: mpsc::Receiver<Notification>,
    mailer: Arc<dyn Mailer>,
    settings: WelcomeSettings,
) {
    while let Some(notification) = rx.recv().await {
        match notification {
            Notification::Welcome {
                registration,
                student_code,
            } => {
                match send_welcome(
                    mailer.as_ref(),
                    &settings,
                    &registration,
                    student_code.as_deref(),
                )
                .await
                {
                    Ok(()) => info!(
                        registration_id = %registration.id,
                        email = %registration.email,
                        "welcome email sent"
                    ),
                    Err(e) => error!(
                        registration_id = %registration.id,
                        email = %registration.email,
                        error = %format!("{e:#}"),
                        "welcome email failed"
                    ),
                }
            }
        }
    }
}

async fn send_welcome(
    mailer: &dyn Mailer,
    settings: &WelcomeSettings,
    registration: &Registration,
    student_code: Option<&str>,
) -> Result<()> {
    let mut to = vec![registration.email.clone()];
    if let Some(code) = student_code {
        let code = code.trim();
        if !code.is_empty() {
            to.push(institutional_address(code, &settings.student_email_domain));
        }
    }

    let html = render_welcome(settings.template.as_deref(), registration, &settings.frontend_url);

    mailer
        .send(&OutboundEmail {
            to,
            subject: WELCOME_SUBJECT.to_string(),
            html: Some(html),
            text: Some(WELCOME_TEXT.to_string()),
        })
        .await
}

/// Derive the institutional address for a student code.
pub fn institutional_address(student_code: &str, domain: &str) -> String {
    format!("{student_code}@{domain}")
}

/// Fill the welcome template, falling back to the built-in body.
pub fn render_welcome(
    template: Option<&str>,
    registration: &Registration,
    frontend_url: &str,
) -> String {
    match template {
        Some(template) => template
            .replace("{{leaderName}}", &registration.leader_name)
            .replace("{{teamName}}", &registration.team_name)
            .replace("{{projectName}}", &registration.project_name)
            .replace("{{frontendUrl}}", frontend_url),
        None => WELCOME_HTML_FALLBACK.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};
    use uuid::Uuid;

    fn registration() -> Registration {
        Registration {
            id: Uuid::new_v4(),
            team_name: "Alpha".to_string(),
            leader_name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            phone: "111".to_string(),
            members: vec!["Ana".to_string()],
            project_name: "P1".to_string(),
            description: "d".to_string(),
            created_at: Utc::now(),
        }
    }

    struct RecordingMailer {
        sent: Mutex<Vec<OutboundEmail>>,
        delay: Duration,
    }

    impl RecordingMailer {
        fn new(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                delay,
            })
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: &OutboundEmail) -> Result<()> {
            tokio::time::sleep(self.delay).await;
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    fn settings(template: Option<String>) -> WelcomeSettings {
        WelcomeSettings {
            frontend_url: "http://localhost:4200".to_string(),
            student_email_domain: "utp.ac.pa".to_string(),
            template,
        }
    }

    #[test]
    fn test_render_welcome_fills_placeholders() {
        let template = "<p>Hola {{leaderName}} de {{teamName}}: {{projectName}} — {{frontendUrl}}</p>";
        let rendered = render_welcome(Some(template), &registration(), "https://hultprizeutp.org");
        assert_eq!(
            rendered,
            "<p>Hola Ana de Alpha: P1 — https://hultprizeutp.org</p>"
        );
    }

    #[test]
    fn test_render_welcome_without_template_uses_fallback() {
        let rendered = render_welcome(None, &registration(), "https://hultprizeutp.org");
        assert!(rendered.contains("Hult Prize UTP"));
    }

    #[test]
    fn test_institutional_address() {
        assert_eq!(institutional_address("8-123-456", "utp.ac.pa"), "8-123-456@utp.ac.pa");
    }

    #[tokio::test]
    async fn test_dispatch_does_not_block_on_slow_mailer() {
        let mailer = RecordingMailer::new(Duration::from_secs(2));
        let notifier = Notifier::spawn(mailer.clone(), settings(None));

        let started = Instant::now();
        notifier.dispatch_welcome(registration(), Some("8-123-456".to_string()));
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_welcome_eventually_sent_with_derived_address() {
        let mailer = RecordingMailer::new(Duration::ZERO);
        let notifier = Notifier::spawn(mailer.clone(), settings(None));

        notifier.dispatch_welcome(registration(), Some("8-123-456".to_string()));

        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            {
                let sent = mailer.sent.lock().unwrap();
                if !sent.is_empty() {
                    assert_eq!(sent[0].to, vec!["ana@x.com", "8-123-456@utp.ac.pa"]);
                    assert_eq!(sent[0].subject, WELCOME_SUBJECT);
                    break;
                }
            }
            assert!(Instant::now() < deadline, "welcome email was never sent");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}
