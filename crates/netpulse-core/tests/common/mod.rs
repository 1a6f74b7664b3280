//! Scripted `NetworkSource` shared by the core integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use netpulse_core::{
    CoreError, InterfaceKind, NetworkInterface, NetworkSource, OperState, ProbeResult, Throughput,
    WifiNetwork,
};

pub const TARGET: IpAddr = IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Interfaces,
    Wifi,
    Throughput,
    Probe,
}

/// Records every query in call order.
#[derive(Debug, Default)]
pub struct CallLog {
    calls: Mutex<Vec<Stage>>,
}

impl CallLog {
    fn record(&self, stage: Stage) -> usize {
        let mut calls = self.calls.lock().unwrap();
        calls.push(stage);
        calls.iter().filter(|s| **s == stage).count()
    }

    pub fn calls(&self) -> Vec<Stage> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, stage: Stage) -> usize {
        self.calls().into_iter().filter(|s| *s == stage).count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Script {
    pub interfaces: Vec<NetworkInterface>,
    pub wifi: Vec<WifiNetwork>,
    pub throughput: Throughput,
    /// Probe replies by call number; the last entry repeats.
    pub probes: Vec<ProbeResult>,
    /// Probe delays by call number; missing entries mean no delay.
    pub probe_delays: Vec<Duration>,
    /// Fail this stage on every call.
    pub fail: Option<Stage>,
    /// Fail this stage on its first call only.
    pub fail_first: Option<Stage>,
}

pub struct ScriptedSource {
    script: Script,
    pub log: Arc<CallLog>,
}

impl ScriptedSource {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            log: Arc::new(CallLog::default()),
        }
    }

    fn check(&self, stage: Stage) -> Result<usize, String> {
        let n = self.log.record(stage);
        if self.script.fail == Some(stage) || (self.script.fail_first == Some(stage) && n == 1) {
            return Err(format!("{stage:?} exploded"));
        }
        Ok(n)
    }
}

impl NetworkSource for ScriptedSource {
    async fn interfaces(&self) -> Result<Vec<NetworkInterface>, CoreError> {
        self.check(Stage::Interfaces)
            .map_err(|message| CoreError::InterfaceQuery { message })?;
        Ok(self.script.interfaces.clone())
    }

    async fn wifi_networks(&self) -> Result<Vec<WifiNetwork>, CoreError> {
        self.check(Stage::Wifi)
            .map_err(|message| CoreError::WifiScan { message })?;
        Ok(self.script.wifi.clone())
    }

    async fn throughput(&self, iface: Option<&str>) -> Result<Throughput, CoreError> {
        self.check(Stage::Throughput)
            .map_err(|message| CoreError::Throughput {
                interface: iface.unwrap_or("-").to_owned(),
                message,
            })?;
        Ok(self.script.throughput)
    }

    async fn probe(&self, target: IpAddr) -> Result<ProbeResult, CoreError> {
        let n = self.check(Stage::Probe).map_err(|message| CoreError::Probe {
            target: target.to_string(),
            message,
        })?;
        if let Some(delay) = self.script.probe_delays.get(n - 1) {
            tokio::time::sleep(*delay).await;
        }
        Ok(self
            .script
            .probes
            .get(n - 1)
            .or_else(|| self.script.probes.last())
            .copied()
            .unwrap_or_default())
    }
}

pub fn iface(name: &str, kind: InterfaceKind, oper_state: OperState, ip: Option<[u8; 4]>) -> NetworkInterface {
    NetworkInterface {
        name: name.into(),
        kind,
        oper_state,
        ipv4: ip.map(Ipv4Addr::from),
    }
}

pub fn wifi(ssid: &str, iface: &str, quality: u8) -> WifiNetwork {
    WifiNetwork {
        ssid: ssid.into(),
        quality,
        iface: iface.into(),
        in_use: true,
    }
}

/// A laptop on Wi-Fi with a downed ethernet port.
pub fn laptop_script() -> Script {
    Script {
        interfaces: vec![
            iface("lo", InterfaceKind::Virtual, OperState::Unknown, Some([127, 0, 0, 1])),
            iface("enp0s31f6", InterfaceKind::Wired, OperState::Down, None),
            iface("wlp3s0", InterfaceKind::Wireless, OperState::Up, Some([192, 168, 1, 42])),
        ],
        wifi: vec![wifi("Upstairs", "wlp4s0", 20), wifi("HomeNet", "wlp3s0", 72)],
        throughput: Throughput {
            rx_bytes_per_sec: Some(1_310_720.0),
            tx_bytes_per_sec: Some(65_536.0),
        },
        probes: vec![ProbeResult::reply(14.2)],
        ..Script::default()
    }
}
