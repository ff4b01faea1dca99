//! Waveplay Server Library
//!
//! Static file server for the Waveplay web UI, with an SPA-style fallback to
//! `index.html`.
//!
//! This library exposes the router and its parts for testing purposes.

pub mod api;
pub mod assets;
pub mod config;
pub mod error;
pub mod state;

use axum::{routing::get, Router};
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use state::AppState;

/// Build the application router
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(api::health::health))
        .fallback(assets::serve_asset)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .with_state(app_state)
}
