/// Health check route
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Whether `index.html` is present under the asset root
    pub ui_available: bool,
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let ui_available = tokio::fs::metadata(state.root().join("index.html"))
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false);

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        ui_available,
    })
}
