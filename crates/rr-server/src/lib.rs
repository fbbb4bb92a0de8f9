//! Road Risk HTTP server library.
//!
//! Thin web layer around [`rr_model`]: one scoring endpoint, a static
//! landing page, and a health probe. The binary entry point is in
//! `main.rs`.

pub mod handlers;
pub mod logging;
pub mod routes;

pub use routes::{create_router, AppState, ServerConfig};
