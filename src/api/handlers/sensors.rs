//! Sensor handlers

use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::BridgeState;
use crate::error::AppError;
use crate::sensors::{self, SensorKind, SensorState};

/// GET /api/sensors - All sensors
pub async fn list_sensors(State(state): State<BridgeState>) -> Json<Vec<SensorState>> {
    let coordinator = state.coordinator.state().await;
    Json(sensors::project_all(&coordinator, &state.instance_id))
}

/// GET /api/sensors/:key - A single sensor
pub async fn get_sensor(
    State(state): State<BridgeState>,
    Path(key): Path<String>,
) -> Result<Json<SensorState>, AppError> {
    let kind = SensorKind::from_key(&key)
        .ok_or_else(|| AppError::NotFound(format!("Unknown sensor: {}", key)))?;

    let coordinator = state.coordinator.state().await;
    Ok(Json(kind.project(&coordinator, &state.instance_id)))
}
