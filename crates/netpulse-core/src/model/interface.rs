// ── Network interface domain types ──

use std::net::Ipv4Addr;

use strum::{Display, EnumString};

/// Kernel-reported operational state (RFC 2863 `ifOperStatus`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OperState {
    Up,
    Down,
    Dormant,
    LowerLayerDown,
    NotPresent,
    Testing,
    #[default]
    Unknown,
}

impl OperState {
    /// Parse an `operstate` value, treating anything unrecognised as unknown.
    pub fn parse_lossy(raw: &str) -> Self {
        raw.trim().parse().unwrap_or_default()
    }
}

/// Broad link type shown as the "Network Type" row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum InterfaceKind {
    Wired,
    Wireless,
    Virtual,
}

/// One host network interface as returned by an interface query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInterface {
    /// Kernel interface name (`eth0`, `wlp3s0`, `en0`).
    pub name: String,
    pub kind: InterfaceKind,
    pub oper_state: OperState,
    /// First IPv4 address bound to the interface.
    pub ipv4: Option<Ipv4Addr>,
}

impl NetworkInterface {
    pub fn is_up(&self) -> bool {
        self.oper_state == OperState::Up
    }
}

/// The active interface: the first one whose operational state is `up`.
pub fn select_active_interface(interfaces: &[NetworkInterface]) -> Option<&NetworkInterface> {
    interfaces.iter().find(|iface| iface.is_up())
}

/// Per-second traffic rates for one interface.
///
/// `None` means the counters could not produce a rate yet (first sample,
/// no active interface); display code clamps it to zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Throughput {
    pub rx_bytes_per_sec: Option<f64>,
    pub tx_bytes_per_sec: Option<f64>,
}
