//! Service handlers: call, broadcast, hangup
//!
//! Command failures come back as values; they are logged here.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;

use crate::api::BridgeState;
use crate::error::{AppError, ClientError};
use crate::models::{BroadcastHandle, BroadcastRequest, CallHandle, CallRequest, HangupRequest};

#[derive(Serialize)]
pub struct HangupResponse {
    pub ok: bool,
    pub call_id: String,
}

/// POST /api/services/call
pub async fn call_service(
    State(state): State<BridgeState>,
    payload: Result<Json<CallRequest>, JsonRejection>,
) -> Result<Json<CallHandle>, AppError> {
    let req = service_data(payload)?;
    match state.commands.place_call(&req).await {
        Ok(handle) => {
            tracing::info!("[Services] Call initiated successfully: {}", handle.call_id);
            Ok(Json(handle))
        }
        Err(e) => {
            log_failure("call", &e);
            Err(e.into())
        }
    }
}

/// POST /api/services/broadcast
pub async fn broadcast_service(
    State(state): State<BridgeState>,
    payload: Result<Json<BroadcastRequest>, JsonRejection>,
) -> Result<Json<BroadcastHandle>, AppError> {
    let req = service_data(payload)?;
    match state.commands.place_broadcast(&req).await {
        Ok(handle) => {
            tracing::info!(
                "[Services] Broadcast initiated successfully: {}",
                handle.broadcast_id
            );
            Ok(Json(handle))
        }
        Err(e) => {
            log_failure("broadcast", &e);
            Err(e.into())
        }
    }
}

/// POST /api/services/hangup
pub async fn hangup_service(
    State(state): State<BridgeState>,
    payload: Result<Json<HangupRequest>, JsonRejection>,
) -> Result<Json<HangupResponse>, AppError> {
    let req = service_data(payload)?;
    let ok = state.commands.hangup(&req.call_id).await;

    if ok {
        tracing::info!("[Services] Call {} hung up successfully", req.call_id);
    } else {
        tracing::error!("[Services] Failed to hangup call {}", req.call_id);
    }

    Ok(Json(HangupResponse {
        ok,
        call_id: req.call_id,
    }))
}

/// Unreadable service data is answered in the same error shape as every other failure
fn service_data<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(req)) => Ok(req),
        Err(rejection) => {
            tracing::warn!("[Services] Invalid service data: {}", rejection.body_text());
            Err(AppError::BadRequest(rejection.body_text()))
        }
    }
}

fn log_failure(action: &str, e: &ClientError) {
    if e.is_local() {
        tracing::warn!("[Services] Rejected {} request: {}", action, e);
    } else {
        tracing::error!("[Services] Failed to initiate {}: {}", action, e);
    }
}
