//! HTTP handlers module

mod sensors;
mod services;

pub use self::sensors::*;
pub use self::services::*;

use axum::{extract::State, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::BridgeState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Health check handler
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "phone-system-bridge".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Coordinator and remote service status
#[derive(Serialize)]
pub struct StatusResponse {
    pub phone_system: String,
    pub reachable: bool,
    pub available: bool,
    pub last_error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// GET /api/status
pub async fn get_status(State(state): State<BridgeState>) -> Json<StatusResponse> {
    let coordinator = state.coordinator.state().await;
    let reachable = state.client.check_health().await.is_ok();

    Json(StatusResponse {
        phone_system: state.client.base_url().to_string(),
        reachable,
        available: coordinator.last_update_success,
        last_error: coordinator.last_error,
        last_updated: coordinator.last_updated,
    })
}
