// ── Cumulative counter → rate conversion ──
//
// Interface byte counters only ever grow (until a driver reset), so a rate
// needs two samples of the same interface. The sampler keeps the previous
// reading per interface name.

use std::collections::HashMap;
use std::time::Instant;

use crate::model::Throughput;

#[derive(Debug, Clone, Copy)]
struct CounterSample {
    rx_bytes: u64,
    tx_bytes: u64,
    at: Instant,
}

/// Turns successive cumulative byte counters into per-second rates.
#[derive(Debug, Default)]
pub struct CounterSampler {
    previous: HashMap<String, CounterSample>,
}

impl CounterSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record totals for `iface` observed at `at` and return the rate since
    /// the previous sample of the same interface.
    ///
    /// The first sample, or one taken at the same instant as the last,
    /// has no rate. A counter that went backwards reads as zero traffic.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn record(&mut self, iface: &str, rx_bytes: u64, tx_bytes: u64, at: Instant) -> Throughput {
        let current = CounterSample {
            rx_bytes,
            tx_bytes,
            at,
        };
        let Some(prev) = self.previous.insert(iface.to_owned(), current) else {
            return Throughput::default();
        };

        let elapsed = at.saturating_duration_since(prev.at).as_secs_f64();
        if elapsed <= 0.0 {
            return Throughput::default();
        }

        Throughput {
            rx_bytes_per_sec: Some(rx_bytes.saturating_sub(prev.rx_bytes) as f64 / elapsed),
            tx_bytes_per_sec: Some(tx_bytes.saturating_sub(prev.tx_bytes) as f64 / elapsed),
        }
    }

    /// Drop samples for interfaces that no longer exist.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.previous.retain(|name, _| keep(name));
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn first_sample_has_no_rate() {
        let mut sampler = CounterSampler::new();
        let rates = sampler.record("eth0", 1_000, 500, Instant::now());
        assert_eq!(rates, Throughput::default());
    }

    #[test]
    fn rate_is_delta_over_elapsed() {
        let mut sampler = CounterSampler::new();
        let t0 = Instant::now();
        sampler.record("eth0", 1_000, 500, t0);
        let rates = sampler.record("eth0", 5_000, 1_500, t0 + Duration::from_secs(2));
        assert_eq!(rates.rx_bytes_per_sec, Some(2_000.0));
        assert_eq!(rates.tx_bytes_per_sec, Some(500.0));
    }

    #[test]
    fn interfaces_are_tracked_separately() {
        let mut sampler = CounterSampler::new();
        let t0 = Instant::now();
        sampler.record("eth0", 1_000, 0, t0);
        let rates = sampler.record("wlan0", 9_000, 0, t0 + Duration::from_secs(1));
        assert_eq!(rates, Throughput::default());
    }

    #[test]
    fn counter_reset_reads_as_zero() {
        let mut sampler = CounterSampler::new();
        let t0 = Instant::now();
        sampler.record("eth0", 10_000, 10_000, t0);
        let rates = sampler.record("eth0", 100, 200, t0 + Duration::from_secs(1));
        assert_eq!(rates.rx_bytes_per_sec, Some(0.0));
        assert_eq!(rates.tx_bytes_per_sec, Some(0.0));
    }

    #[test]
    fn same_instant_has_no_rate() {
        let mut sampler = CounterSampler::new();
        let t0 = Instant::now();
        sampler.record("eth0", 0, 0, t0);
        assert_eq!(sampler.record("eth0", 50, 50, t0), Throughput::default());
    }

    #[test]
    fn retain_forgets_removed_interfaces() {
        let mut sampler = CounterSampler::new();
        let t0 = Instant::now();
        sampler.record("usb0", 100, 100, t0);
        sampler.retain(|name| name != "usb0");
        let rates = sampler.record("usb0", 200, 200, t0 + Duration::from_secs(1));
        assert_eq!(rates, Throughput::default());
    }
}
