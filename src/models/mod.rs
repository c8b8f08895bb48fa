//! Data models for the phone system bridge

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ============================================================================
// Snapshot Models
// ============================================================================

/// Consolidated view of the telephony service, replaced wholesale on every poll
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub active_calls: Vec<CallRecord>,
    #[serde(default)]
    pub call_history: Vec<CallRecord>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub broadcasts: Vec<Broadcast>,
}

/// Call state as reported by the service. Statuses this bridge does not name
/// are carried through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CallStatus {
    Ringing,
    InProgress,
    Completed,
    Failed,
    Busy,
    NoAnswer,
    #[default]
    Unknown,
    Other(String),
}

impl CallStatus {
    pub fn as_str(&self) -> &str {
        match self {
            CallStatus::Ringing => "ringing",
            CallStatus::InProgress => "in-progress",
            CallStatus::Completed => "completed",
            CallStatus::Failed => "failed",
            CallStatus::Busy => "busy",
            CallStatus::NoAnswer => "no-answer",
            CallStatus::Unknown => "unknown",
            CallStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for CallStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "ringing" => CallStatus::Ringing,
            "in-progress" => CallStatus::InProgress,
            "completed" => CallStatus::Completed,
            "failed" => CallStatus::Failed,
            "busy" => CallStatus::Busy,
            "no-answer" => CallStatus::NoAnswer,
            "unknown" => CallStatus::Unknown,
            _ => CallStatus::Other(raw),
        }
    }
}

impl From<CallStatus> for String {
    fn from(status: CallStatus) -> Self {
        match status {
            CallStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub call_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: CallStatus,
    /// Seconds
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub member_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BroadcastStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    #[default]
    Unknown,
    Other(String),
}

impl BroadcastStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BroadcastStatus::Pending => "pending",
            BroadcastStatus::Processing => "processing",
            BroadcastStatus::Completed => "completed",
            BroadcastStatus::Failed => "failed",
            BroadcastStatus::Unknown => "unknown",
            BroadcastStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for BroadcastStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => BroadcastStatus::Pending,
            "processing" => BroadcastStatus::Processing,
            "completed" => BroadcastStatus::Completed,
            "failed" => BroadcastStatus::Failed,
            "unknown" => BroadcastStatus::Unknown,
            _ => BroadcastStatus::Other(raw),
        }
    }
}

impl From<BroadcastStatus> for String {
    fn from(status: BroadcastStatus) -> Self {
        match status {
            BroadcastStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Broadcast {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: BroadcastStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_numbers: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: u32,
}

/// Record fields the service sends as `null` read as their default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Response envelopes of the telephony service. Missing keys become empty lists.

#[derive(Debug, Deserialize)]
pub(crate) struct ActiveCallsResponse {
    #[serde(default)]
    pub active_calls: Vec<CallRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CallHistoryResponse {
    #[serde(default)]
    pub calls: Vec<CallRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroupsResponse {
    #[serde(default)]
    pub groups: Vec<Group>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BroadcastsResponse {
    #[serde(default)]
    pub broadcasts: Vec<Broadcast>,
}

// ============================================================================
// Service (command) Models
// ============================================================================

/// `call` service data
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CallRequest {
    pub phone_number: String,
    pub tts_text: Option<String>,
    pub recording_file: Option<String>,
    pub caller_id: Option<String>,
    pub max_retries: u32,
    pub pre_message_delay: u32,
    pub max_ring_time: u32,
}

impl Default for CallRequest {
    fn default() -> Self {
        Self {
            phone_number: String::new(),
            tts_text: None,
            recording_file: None,
            caller_id: None,
            max_retries: 3,
            pre_message_delay: 1,
            max_ring_time: 45,
        }
    }
}

/// `broadcast` service data
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BroadcastRequest {
    pub name: String,
    pub group_name: Option<String>,
    pub phone_numbers: Option<Vec<String>>,
    pub tts_text: Option<String>,
    pub recording_file: Option<String>,
    pub caller_id: Option<String>,
    pub concurrent_calls: u32,
    pub pre_message_delay: u32,
    pub max_ring_time: u32,
}

impl Default for BroadcastRequest {
    fn default() -> Self {
        Self {
            name: String::new(),
            group_name: None,
            phone_numbers: None,
            tts_text: None,
            recording_file: None,
            caller_id: None,
            concurrent_calls: 5,
            pre_message_delay: 1,
            max_ring_time: 45,
        }
    }
}

/// `hangup` service data
#[derive(Debug, Clone, Deserialize)]
pub struct HangupRequest {
    #[serde(default)]
    pub call_id: String,
}

/// What gets played once the callee answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Message {
    #[serde(rename = "tts_text")]
    Tts(String),
    #[serde(rename = "recording_file")]
    Recording(String),
}

impl Message {
    /// Picks the message to play. TTS wins when both are set; blank values count as unset.
    pub fn resolve(
        tts_text: Option<&str>,
        recording_file: Option<&str>,
    ) -> Result<Self, ValidationError> {
        if let Some(text) = non_blank(tts_text) {
            Ok(Message::Tts(text.to_string()))
        } else if let Some(file) = non_blank(recording_file) {
            Ok(Message::Recording(file.to_string()))
        } else {
            Err(ValidationError::MissingPayload)
        }
    }
}

/// Who a broadcast dials
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Target {
    #[serde(rename = "group_name")]
    Group(String),
    #[serde(rename = "phone_numbers")]
    Numbers(Vec<String>),
}

impl Target {
    /// Group wins when both are set; an empty number list counts as unset.
    pub fn resolve(
        group_name: Option<&str>,
        phone_numbers: Option<&[String]>,
    ) -> Result<Self, ValidationError> {
        if let Some(group) = non_blank(group_name) {
            return Ok(Target::Group(group.to_string()));
        }
        match phone_numbers {
            Some(numbers) if !numbers.is_empty() => Ok(Target::Numbers(numbers.to_vec())),
            _ => Err(ValidationError::MissingTargets),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Body of `POST /api/call`
#[derive(Debug, Serialize)]
pub(crate) struct CallBody<'a> {
    pub phone_number: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller_id: Option<&'a str>,
    #[serde(flatten)]
    pub message: Message,
    pub max_retries: u32,
    pub pre_message_delay: u32,
    pub max_ring_time: u32,
}

/// Body of `POST /api/broadcast`
#[derive(Debug, Serialize)]
pub(crate) struct BroadcastBody<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller_id: Option<&'a str>,
    #[serde(flatten)]
    pub target: Target,
    #[serde(flatten)]
    pub message: Message,
    pub concurrent_calls: u32,
    pub pre_message_delay: u32,
    pub max_ring_time: u32,
}

/// Acknowledgement of a started call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallHandle {
    pub call_id: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Acknowledgement of a started broadcast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastHandle {
    pub broadcast_id: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
