// ── Runtime monitor configuration ──
//
// Describes *how* the monitor polls. Never touches disk: the TUI (via
// netpulse-config) builds a `MonitorConfig` and hands it in.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

/// Default polling cadence.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(2000);

/// Default latency probe target (Google public DNS).
pub const DEFAULT_PROBE_TARGET: IpAddr = IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8));

/// Default time to wait for a single echo reply.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Configuration for a [`Monitor`](crate::Monitor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Time between automatic poll cycles.
    pub interval: Duration,
    /// Address the latency probe pings.
    pub probe_target: IpAddr,
    /// How long the probe waits for an echo reply.
    pub probe_timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            probe_target: DEFAULT_PROBE_TARGET,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}
