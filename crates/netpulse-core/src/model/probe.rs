// ── ICMP probe result ──

/// Outcome of a single echo request.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProbeResult {
    /// Whether a reply came back.
    pub alive: bool,
    /// Round-trip time in milliseconds; `None` when unreachable.
    pub time_ms: Option<f64>,
}

impl ProbeResult {
    pub fn reply(time_ms: f64) -> Self {
        Self {
            alive: true,
            time_ms: Some(time_ms),
        }
    }

    pub fn unreachable() -> Self {
        Self::default()
    }
}
