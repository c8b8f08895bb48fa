//! Read-only projections of the latest snapshot, one per host sensor

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::models::BroadcastStatus;
use crate::phone::CoordinatorState;

/// Number of broadcasts listed in the broadcasts sensor
const RECENT_BROADCASTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    ActiveCalls,
    TotalCalls,
    Groups,
    Broadcasts,
}

#[derive(Debug, Clone, Serialize)]
pub struct SensorState {
    pub key: &'static str,
    pub name: &'static str,
    pub unique_id: String,
    pub icon: &'static str,
    pub state: usize,
    pub available: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub attributes: Value,
}

impl SensorKind {
    pub const ALL: [SensorKind; 4] = [
        SensorKind::ActiveCalls,
        SensorKind::TotalCalls,
        SensorKind::Groups,
        SensorKind::Broadcasts,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SensorKind::ActiveCalls => "active_calls",
            SensorKind::TotalCalls => "total_calls",
            SensorKind::Groups => "groups",
            SensorKind::Broadcasts => "broadcasts",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    pub fn name(self) -> &'static str {
        match self {
            SensorKind::ActiveCalls => "Phone System Active Calls",
            SensorKind::TotalCalls => "Phone System Total Calls",
            SensorKind::Groups => "Phone System Groups",
            SensorKind::Broadcasts => "Phone System Broadcasts",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            SensorKind::ActiveCalls => "mdi:phone-in-talk",
            SensorKind::TotalCalls => "mdi:phone-log",
            SensorKind::Groups => "mdi:account-group",
            SensorKind::Broadcasts => "mdi:bullhorn",
        }
    }

    /// Project the coordinator state; `instance_id` scopes the unique id
    pub fn project(self, coordinator: &CoordinatorState, instance_id: &str) -> SensorState {
        let snapshot = &coordinator.snapshot;

        let (state, attributes) = match self {
            SensorKind::ActiveCalls => (
                snapshot.active_calls.len(),
                json!({ "calls": snapshot.active_calls }),
            ),
            SensorKind::TotalCalls => (snapshot.call_history.len(), json!({})),
            SensorKind::Groups => (snapshot.groups.len(), json!({ "groups": snapshot.groups })),
            SensorKind::Broadcasts => {
                let processing = snapshot
                    .broadcasts
                    .iter()
                    .filter(|b| b.status == BroadcastStatus::Processing)
                    .count();
                let recent = &snapshot.broadcasts[..snapshot.broadcasts.len().min(RECENT_BROADCASTS)];
                (
                    processing,
                    json!({
                        "total_broadcasts": snapshot.broadcasts.len(),
                        "recent_broadcasts": recent,
                    }),
                )
            }
        };

        SensorState {
            key: self.key(),
            name: self.name(),
            unique_id: format!("{}_{}", instance_id, self.key()),
            icon: self.icon(),
            state,
            available: coordinator.last_update_success,
            last_updated: coordinator.last_updated,
            attributes,
        }
    }
}

/// All sensors, in registration order
pub fn project_all(coordinator: &CoordinatorState, instance_id: &str) -> Vec<SensorState> {
    SensorKind::ALL
        .into_iter()
        .map(|kind| kind.project(coordinator, instance_id))
        .collect()
}
