//! Telephony service integration module
//!
//! - `client`: Low-level HTTP client for the telephony service
//! - `coordinator`: Owns the latest snapshot and its staleness
//! - `sync`: Background polling loop
//! - `commands`: Call, broadcast and hangup actions

pub mod client;
pub mod commands;
pub mod coordinator;
pub mod sync;

pub use client::PhoneClient;
pub use commands::CommandClient;
pub use coordinator::{Coordinator, CoordinatorState};
pub use sync::PhoneSyncer;

/// Something that can be asked to poll again soon
pub trait RefreshRequester: Send + Sync {
    fn request_refresh(&self);
}
