// ── Published UI state ──
//
// A `NetworkSnapshot` is built fresh by every successful poll cycle and
// replaces the previous one wholesale. `PollStatus` is the single slot the
// monitor publishes through its watch channel.

use std::sync::Arc;

use chrono::{DateTime, Local};

use super::wifi::WifiLink;

/// Fully formatted display values for one poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSnapshot {
    pub download_speed: String,
    pub upload_speed: String,
    pub latency: String,
    pub network_type: String,
    pub ip_address: String,
    pub wifi: Option<WifiLink>,
}

/// What the view shows: nothing yet, a complete snapshot, or an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PollState {
    #[default]
    Loading,
    Ready(Arc<NetworkSnapshot>),
    Failed(String),
}

impl PollState {
    pub fn snapshot(&self) -> Option<&NetworkSnapshot> {
        match self {
            Self::Ready(snapshot) => Some(snapshot),
            Self::Loading | Self::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            Self::Loading | Self::Ready(_) => None,
        }
    }
}

/// The monitor's published state slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PollStatus {
    pub state: PollState,
    /// Poll generation that produced `state` (0 before the first result).
    pub generation: u64,
    /// Cycles currently running.
    pub in_flight: u32,
    /// When `state` was last replaced.
    pub updated_at: Option<DateTime<Local>>,
}

impl PollStatus {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }
}
