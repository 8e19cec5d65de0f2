//! Application setup and server configuration.

use std::sync::Arc;

use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domains::registration::RegistrationWriter;
use crate::domains::verification::VerificationIssuer;
use crate::kernel::{EventHub, Mailer, Notifier, WelcomeSettings};
use crate::server::routes::{
    create_registration, create_sponsor, health_handler, list_registrations, list_sponsors,
    stream_handler, verify_student,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub writer: RegistrationWriter,
    pub issuer: VerificationIssuer,
    pub event_hub: EventHub,
    pub notifier: Notifier,
}

impl AppState {
    /// Wire the components around one shared pool and one mail transport.
    ///
    /// Spawns the notification dispatcher task as a side effect.
    pub fn new(pool: PgPool, mailer: Arc<dyn Mailer>, welcome: WelcomeSettings) -> Self {
        let writer = RegistrationWriter::new(pool.clone());
        let issuer =
            VerificationIssuer::new(pool.clone(), mailer.clone(), welcome.frontend_url.clone());
        let event_hub = EventHub::new();
        let notifier = Notifier::spawn(mailer, welcome);

        Self {
            db_pool: pool,
            writer,
            issuer,
            event_hub,
            notifier,
        }
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/registro", post(create_registration))
        .route("/registrations", get(list_registrations))
        .route("/verify-student", post(verify_student))
        .route("/sponsors", post(create_sponsor).get(list_sponsors))
        .route("/events/:topic", get(stream_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
