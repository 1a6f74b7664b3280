// ── Host-backed NetworkSource ──
//
// sysinfo supplies interface names, addresses and byte counters; sysfs (on
// Linux) supplies ordering, link state and link type; nmcli and ping cover
// Wi-Fi and latency.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use sysinfo::Networks;
use tracing::trace;

use super::counters::CounterSampler;
use super::{NetworkSource, nmcli, ping};
use crate::config::DEFAULT_PROBE_TIMEOUT;
use crate::error::CoreError;
use crate::model::{NetworkInterface, ProbeResult, Throughput, WifiNetwork};
#[cfg(not(target_os = "linux"))]
use crate::model::{InterfaceKind, OperState};

/// The default [`NetworkSource`]: queries the local host.
pub struct SystemSource {
    networks: Mutex<Networks>,
    sampler: Mutex<CounterSampler>,
    probe_timeout: Duration,
}

impl SystemSource {
    pub fn new(probe_timeout: Duration) -> Self {
        Self {
            networks: Mutex::new(Networks::new_with_refreshed_list()),
            sampler: Mutex::new(CounterSampler::new()),
            probe_timeout,
        }
    }

    fn networks(&self) -> MutexGuard<'_, Networks> {
        self.networks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sampler(&self) -> MutexGuard<'_, CounterSampler> {
        self.sampler.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Refresh the interface list and return each interface's first IPv4.
    fn ipv4_addresses(&self) -> HashMap<String, Option<Ipv4Addr>> {
        let mut networks = self.networks();
        networks.refresh(true);
        networks
            .iter()
            .map(|(name, data)| {
                let ipv4 = data.ip_networks().iter().find_map(|net| match net.addr {
                    IpAddr::V4(v4) => Some(v4),
                    IpAddr::V6(_) => None,
                });
                (name.clone(), ipv4)
            })
            .collect()
    }
}

impl Default for SystemSource {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

impl NetworkSource for SystemSource {
    #[cfg(target_os = "linux")]
    async fn interfaces(&self) -> Result<Vec<NetworkInterface>, CoreError> {
        use std::path::Path;

        use super::sysfs;

        let addresses = self.ipv4_addresses();
        let links = sysfs::read_links(Path::new(sysfs::SYSFS_NET)).await?;
        Ok(links
            .into_iter()
            .map(|link| NetworkInterface {
                ipv4: addresses.get(&link.name).copied().flatten(),
                name: link.name,
                kind: link.kind,
                oper_state: link.oper_state,
            })
            .collect())
    }

    #[cfg(not(target_os = "linux"))]
    async fn interfaces(&self) -> Result<Vec<NetworkInterface>, CoreError> {
        // No portable link state: an interface holding a routable IPv4 is
        // treated as up.
        let mut interfaces: Vec<NetworkInterface> = self
            .ipv4_addresses()
            .into_iter()
            .map(|(name, ipv4)| {
                let loopback = ipv4.is_some_and(|ip| ip.is_loopback()) || name.starts_with("lo");
                let oper_state = if ipv4.is_some() && !loopback {
                    OperState::Up
                } else {
                    OperState::Unknown
                };
                NetworkInterface {
                    name,
                    kind: if loopback {
                        InterfaceKind::Virtual
                    } else {
                        InterfaceKind::Wired
                    },
                    oper_state,
                    ipv4,
                }
            })
            .collect();
        interfaces.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(interfaces)
    }

    async fn wifi_networks(&self) -> Result<Vec<WifiNetwork>, CoreError> {
        nmcli::scan().await
    }

    async fn throughput(&self, iface: Option<&str>) -> Result<Throughput, CoreError> {
        let Some(iface) = iface else {
            return Ok(Throughput::default());
        };

        let networks = {
            let mut networks = self.networks();
            networks.refresh(true);
            networks
                .iter()
                .map(|(name, data)| (name.clone(), (data.total_received(), data.total_transmitted())))
                .collect::<HashMap<_, _>>()
        };
        let now = Instant::now();

        let (rx, tx) = networks
            .get(iface)
            .copied()
            .ok_or_else(|| CoreError::Throughput {
                interface: iface.to_owned(),
                message: "interface has no traffic counters".into(),
            })?;
        trace!(iface, rx, tx, "sampled counters");

        let mut sampler = self.sampler();
        sampler.retain(|name| networks.contains_key(name));
        Ok(sampler.record(iface, rx, tx, now))
    }

    async fn probe(&self, target: IpAddr) -> Result<ProbeResult, CoreError> {
        ping::probe(target, self.probe_timeout).await
    }
}
