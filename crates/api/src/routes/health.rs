//! Health check endpoint.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

/// GET /health: reports that the process is up.
pub async fn check(service: &'static str) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service,
    })
}
