//! All possible UI actions. Actions are the sole mechanism for state mutation.

use netpulse_core::PollStatus;

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,

    // ── Monitor ───────────────────────────────────────────────────
    /// Run a poll cycle now.
    Refresh,
    /// The monitor published a new state.
    PollUpdated(Box<PollStatus>),

    // ── Overlays ──────────────────────────────────────────────────
    OpenSearch,
    ToggleHelp,
}
