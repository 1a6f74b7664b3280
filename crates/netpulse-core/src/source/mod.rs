// ── Data source seam ──
//
// The poll cycle only ever talks to a `NetworkSource`. `SystemSource` is the
// real host-backed implementation; tests substitute scripted sources.

mod counters;
mod nmcli;
mod ping;
#[cfg(target_os = "linux")]
mod sysfs;
mod system;

use std::future::Future;
use std::net::IpAddr;

use crate::error::CoreError;
use crate::model::{NetworkInterface, ProbeResult, Throughput, WifiNetwork};

pub use counters::CounterSampler;
pub use nmcli::parse_wifi_list;
pub use ping::parse_round_trip;
pub use system::SystemSource;

/// The three external services a poll cycle consumes.
///
/// Interface enumeration and throughput counters usually come from the same
/// system-information backend; Wi-Fi scanning and the ICMP probe are
/// separate tools.
pub trait NetworkSource: Send + Sync + 'static {
    /// Enumerate host interfaces in kernel order.
    fn interfaces(&self) -> impl Future<Output = Result<Vec<NetworkInterface>, CoreError>> + Send;

    /// List visible Wi-Fi networks across all wireless interfaces.
    fn wifi_networks(&self) -> impl Future<Output = Result<Vec<WifiNetwork>, CoreError>> + Send;

    /// Traffic rates for `iface`; `None` yields empty rates.
    fn throughput(
        &self,
        iface: Option<&str>,
    ) -> impl Future<Output = Result<Throughput, CoreError>> + Send;

    /// Send one ICMP echo to `target`.
    fn probe(&self, target: IpAddr) -> impl Future<Output = Result<ProbeResult, CoreError>> + Send;
}
