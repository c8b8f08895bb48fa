//! Coordinator: single owner of the latest telephony snapshot
//!
//! Every refresh fetches all four resources and, only if all of them succeed,
//! swaps in a brand-new snapshot. A failed refresh keeps the previous snapshot
//! and flags the data as stale until the next successful one.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Notify, RwLock};
use tokio::time;

use crate::error::ClientError;
use crate::models::Snapshot;
use crate::phone::{PhoneClient, RefreshRequester};

#[derive(Debug, Clone)]
pub struct CoordinatorState {
    pub snapshot: Arc<Snapshot>,
    pub last_update_success: bool,
    pub last_error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for CoordinatorState {
    fn default() -> Self {
        Self {
            snapshot: Arc::new(Snapshot::default()),
            last_update_success: false,
            last_error: None,
            last_updated: None,
        }
    }
}

pub struct Coordinator {
    client: PhoneClient,
    history_limit: u32,
    timeout: Duration,
    state: RwLock<CoordinatorState>,
    refresh_wanted: Notify,
}

impl Coordinator {
    /// `timeout` bounds a whole refresh cycle, all four requests included.
    pub fn new(client: PhoneClient, history_limit: u32, timeout: Duration) -> Self {
        Self {
            client,
            history_limit,
            timeout,
            state: RwLock::new(CoordinatorState::default()),
            refresh_wanted: Notify::new(),
        }
    }

    pub async fn state(&self) -> CoordinatorState {
        self.state.read().await.clone()
    }

    /// Fetch everything and publish a new snapshot
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, ClientError> {
        let result = match time::timeout(self.timeout, self.fetch()).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Timeout),
        };

        let mut state = self.state.write().await;
        match result {
            Ok(snapshot) => {
                if !state.last_update_success && state.last_updated.is_some() {
                    tracing::info!("[PhoneSync] Fetching phone system data recovered");
                }

                let snapshot = Arc::new(snapshot);
                *state = CoordinatorState {
                    snapshot: snapshot.clone(),
                    last_update_success: true,
                    last_error: None,
                    last_updated: Some(Utc::now()),
                };
                Ok(snapshot)
            }
            Err(e) => {
                if state.last_update_success {
                    tracing::warn!("[PhoneSync] Error communicating with API, data is stale: {}", e);
                }

                *state = CoordinatorState {
                    snapshot: state.snapshot.clone(),
                    last_update_success: false,
                    last_error: Some(e.to_string()),
                    last_updated: state.last_updated,
                };
                Err(e)
            }
        }
    }

    async fn fetch(&self) -> Result<Snapshot, ClientError> {
        let (active_calls, call_history, groups, broadcasts) = futures::try_join!(
            self.client.active_calls(),
            self.client.call_history(self.history_limit),
            self.client.groups(),
            self.client.broadcasts(),
        )?;

        Ok(Snapshot {
            active_calls,
            call_history,
            groups,
            broadcasts,
        })
    }

    /// Resolves once someone asked for an out-of-band refresh.
    /// Requests made while nobody waits collapse into one.
    pub async fn refresh_requested(&self) {
        self.refresh_wanted.notified().await;
    }
}

impl RefreshRequester for Coordinator {
    fn request_refresh(&self) {
        self.refresh_wanted.notify_one();
    }
}
