// ── Core error types ──
//
// User-facing errors from netpulse-core. The message of whichever error
// aborts a poll cycle is what the TUI shows in place of the status list,
// so every variant renders as a complete sentence fragment.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Data source errors ───────────────────────────────────────────
    #[error("Failed to query network interfaces: {message}")]
    InterfaceQuery { message: String },

    #[error("Wi-Fi scan failed: {message}")]
    WifiScan { message: String },

    #[error("Failed to read traffic counters for {interface}: {message}")]
    Throughput { interface: String, message: String },

    #[error("Latency probe to {target} failed: {message}")]
    Probe { target: String, message: String },
}
