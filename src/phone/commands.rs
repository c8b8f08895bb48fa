//! CommandClient: call-control actions against the telephony service
//!
//! Input is validated locally first; nothing is sent when validation fails.
//! A refresh is requested after every acknowledged command, never after a
//! failed one.

use std::sync::Arc;

use crate::error::{ClientError, ValidationError};
use crate::models::{
    BroadcastBody, BroadcastHandle, BroadcastRequest, CallBody, CallHandle, CallRequest, Message,
    Target,
};
use crate::phone::{PhoneClient, RefreshRequester};

pub struct CommandClient {
    client: PhoneClient,
    refresher: Arc<dyn RefreshRequester>,
}

impl CommandClient {
    pub fn new(client: PhoneClient, refresher: Arc<dyn RefreshRequester>) -> Self {
        Self { client, refresher }
    }

    /// `POST /api/call`
    pub async fn place_call(&self, req: &CallRequest) -> Result<CallHandle, ClientError> {
        let message = Message::resolve(req.tts_text.as_deref(), req.recording_file.as_deref())?;
        if req.phone_number.trim().is_empty() {
            return Err(ValidationError::MissingPhoneNumber.into());
        }

        let body = CallBody {
            phone_number: &req.phone_number,
            caller_id: non_empty(req.caller_id.as_deref()),
            message,
            max_retries: req.max_retries,
            pre_message_delay: req.pre_message_delay,
            max_ring_time: req.max_ring_time,
        };

        let handle: CallHandle = self.client.post_json(&["api", "call"], &body).await?;
        self.refresher.request_refresh();
        Ok(handle)
    }

    /// `POST /api/broadcast`
    pub async fn place_broadcast(
        &self,
        req: &BroadcastRequest,
    ) -> Result<BroadcastHandle, ClientError> {
        let target = Target::resolve(req.group_name.as_deref(), req.phone_numbers.as_deref())?;
        let message = Message::resolve(req.tts_text.as_deref(), req.recording_file.as_deref())?;

        let body = BroadcastBody {
            name: &req.name,
            caller_id: non_empty(req.caller_id.as_deref()),
            target,
            message,
            concurrent_calls: req.concurrent_calls,
            pre_message_delay: req.pre_message_delay,
            max_ring_time: req.max_ring_time,
        };

        let handle: BroadcastHandle = self.client.post_json(&["api", "broadcast"], &body).await?;
        self.refresher.request_refresh();
        Ok(handle)
    }

    /// `POST /api/calls/{call_id}/hangup`; true when the service acknowledged it
    pub async fn hangup(&self, call_id: &str) -> bool {
        if call_id.trim().is_empty() {
            tracing::debug!("[PhoneClient] Hangup skipped: {}", ValidationError::MissingCallId);
            return false;
        }

        match self
            .client
            .post_empty(&["api", "calls", call_id, "hangup"])
            .await
        {
            Ok(()) => {
                self.refresher.request_refresh();
                true
            }
            Err(e) => {
                tracing::debug!("[PhoneClient] Hangup of {} failed: {}", call_id, e);
                false
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
