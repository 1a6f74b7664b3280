//! Display formatting for snapshot fields.

use std::net::Ipv4Addr;

use crate::model::{InterfaceKind, ProbeResult};

/// Placeholder for a field whose source could not be determined.
pub const UNKNOWN: &str = "Unknown";

/// Bits in a mebibit. Rates are reported against this, not 10^6.
const BITS_PER_MEBIBIT: f64 = 1_048_576.0;

/// Convert a byte rate to megabits per second.
pub fn bytes_to_mbps(bytes_per_sec: f64) -> f64 {
    bytes_per_sec * 8.0 / BITS_PER_MEBIBIT
}

/// Format a byte rate as `"12.34 Mbps"`. Absent or negative rates show as zero.
pub fn fmt_speed(bytes_per_sec: Option<f64>) -> String {
    let rate = bytes_per_sec.unwrap_or(0.0).max(0.0);
    format!("{:.2} Mbps", bytes_to_mbps(rate))
}

/// Format a probe round trip as `"<time> ms"`.
///
/// An unreachable target keeps the probe's own sentinel (`"unknown ms"`).
pub fn fmt_latency(probe: &ProbeResult) -> String {
    match probe.time_ms {
        Some(ms) => format!("{ms} ms"),
        None => "unknown ms".into(),
    }
}

/// Format Wi-Fi signal quality as `"72%"`.
pub fn fmt_quality(quality: u8) -> String {
    format!("{quality}%")
}

pub fn fmt_network_type(kind: Option<InterfaceKind>) -> String {
    kind.map_or_else(|| UNKNOWN.into(), |k| k.to_string())
}

pub fn fmt_ip(ip: Option<Ipv4Addr>) -> String {
    ip.map_or_else(|| UNKNOWN.into(), |ip| ip.to_string())
}
