use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::services::conversation::{RegistryStats, SessionRegistry};

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

pub async fn readiness_check() -> StatusCode {
    StatusCode::OK
}

pub async fn stats_check(
    Extension(registry): Extension<SessionRegistry>,
) -> Json<RegistryStats> {
    Json(registry.stats())
}
