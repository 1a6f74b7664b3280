// ── Domain model ──
//
// Transient poll inputs (interfaces, scan results, probe replies) and the
// formatted snapshot the view renders.

pub mod interface;
pub mod probe;
pub mod snapshot;
pub mod wifi;

pub use interface::{
    InterfaceKind, NetworkInterface, OperState, Throughput, select_active_interface,
};
pub use probe::ProbeResult;
pub use snapshot::{NetworkSnapshot, PollState, PollStatus};
pub use wifi::{WifiLink, WifiNetwork, match_wifi};
