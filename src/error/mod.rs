//! Error handling module

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Input rejected before anything is sent to the telephony service
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Either tts_text or recording_file must be provided")]
    MissingPayload,

    #[error("Either group_name or phone_numbers must be provided")]
    MissingTargets,

    #[error("phone_number must be provided")]
    MissingPhoneNumber,

    #[error("call_id must be provided")]
    MissingCallId,
}

/// Failure talking to the telephony service
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Remote returned HTTP {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl ClientError {
    /// True for errors raised locally, without a network round trip
    pub fn is_local(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ClientError::Status(status.as_u16())
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Phone system error: {0}")]
    Upstream(String),
}

impl From<ClientError> for AppError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Validation(v) => AppError::BadRequest(v.to_string()),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
        };

        let body = Json(serde_json::json!({
            "error": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}
