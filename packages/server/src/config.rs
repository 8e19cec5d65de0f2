use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Base URL of the public frontend, used in emails and verification links
    pub frontend_url: String,
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_from_email: String,
    pub mail_from_name: Option<String>,
    /// Domain appended to a student code to form the institutional address
    pub student_email_domain: String,
    /// Path to the optional HTML welcome template
    pub welcome_template_path: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:4200".to_string()),
            mail_api_url: env::var("MAIL_API_URL")
                .unwrap_or_else(|_| "https://api.brevo.com/v3/smtp/email".to_string()),
            mail_api_key: env::var("MAIL_API_KEY")
                .context("MAIL_API_KEY must be set")?,
            mail_from_email: env::var("FROM_EMAIL")
                .context("FROM_EMAIL must be set")?,
            mail_from_name: env::var("FROM_NAME").ok(),
            student_email_domain: env::var("STUDENT_EMAIL_DOMAIN")
                .unwrap_or_else(|_| "utp.ac.pa".to_string()),
            welcome_template_path: env::var("WELCOME_TEMPLATE_PATH")
                .unwrap_or_else(|_| "templates/welcome.html".to_string()),
        })
    }
}
