//! Health check handler

use serde::Serialize;
use shared::response::ApiResponse;

#[derive(Debug, Serialize)]
pub struct HealthInfo {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /api/health - liveness check, no authentication
pub async fn health() -> ApiResponse<HealthInfo> {
    ApiResponse::success(HealthInfo {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
