//! Axum router configuration for the prediction API.

use axum::{
    routing::{get, post},
    Router,
};
use rr_model::RiskPriors;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Application state shared across handlers. The tables are built once
/// here and only ever read afterwards.
#[derive(Debug)]
pub struct AppState {
    pub priors: RiskPriors,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            priors: RiskPriors::builtin(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the application router.
///
/// # Routes
///
/// - `GET /` - Static informational page
/// - `GET /health` - Liveness probe
/// - `POST /predict` - Score an observation
pub fn create_router(state: Arc<AppState>) -> Router {
    // Permissive CORS for browser clients.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
