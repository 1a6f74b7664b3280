//! Polling and formatting layer behind the netpulse TUI.
//!
//! - **[`Monitor`]**: Owns the polling task: started on mount, one cycle
//!   immediately and then every interval, manual [`refresh`](Monitor::refresh)
//!   on demand, deterministic [`shutdown`](Monitor::shutdown) on unmount.
//!   Publishes a single [`PollStatus`] slot through a `tokio::sync::watch`
//!   channel; a poll generation guard keeps slow stale cycles from
//!   overwriting newer results.
//!
//! - **[`poll_cycle`]**: One sequential pass: interfaces → Wi-Fi →
//!   throughput → latency probe, formatted into a [`NetworkSnapshot`].
//!
//! - **[`NetworkSource`]**: The seam to the host. [`SystemSource`] reads
//!   sysinfo/sysfs, `nmcli` and `ping`; tests plug in scripted sources.
//!
//! - **Domain model** ([`model`]) and display helpers ([`format`]).

pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod monitor;
pub mod poll;
pub mod source;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::MonitorConfig;
pub use error::CoreError;
pub use monitor::{Monitor, Trigger};
pub use poll::{GENERIC_ERROR, poll_cycle};
pub use source::{NetworkSource, SystemSource};

pub use model::{
    InterfaceKind, NetworkInterface, NetworkSnapshot, OperState, PollState, PollStatus,
    ProbeResult, Throughput, WifiLink, WifiNetwork,
};
