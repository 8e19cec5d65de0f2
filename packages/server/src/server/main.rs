// Main entry point for the registration API server

use std::sync::Arc;

use anyhow::{Context, Result};
use registro_core::kernel::{HttpMailer, Mailer, WelcomeSettings};
use registro_core::server::{build_app, AppState};
use registro_core::Config;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,registro_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Hult Prize UTP registration API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // Mail transport
    let mailer: Arc<dyn Mailer> = Arc::new(HttpMailer::new(
        config.mail_api_url.clone(),
        config.mail_api_key.clone(),
        config.mail_from_email.clone(),
        config.mail_from_name.clone(),
    ));

    // Welcome template is optional; fall back to the plain body when absent
    let template = match tokio::fs::read_to_string(&config.welcome_template_path).await {
        Ok(template) => Some(template),
        Err(e) => {
            tracing::warn!(
                path = %config.welcome_template_path,
                error = %e,
                "welcome template not loaded, using built-in fallback"
            );
            None
        }
    };

    // Build application
    let state = AppState::new(
        pool,
        mailer,
        WelcomeSettings {
            frontend_url: config.frontend_url.clone(),
            student_email_domain: config.student_email_domain.clone(),
            template,
        },
    );
    let app = build_app(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
