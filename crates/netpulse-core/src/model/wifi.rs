// ── Wi-Fi domain types ──

/// One visible Wi-Fi network from a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiNetwork {
    pub ssid: String,
    /// Signal quality, 0-100.
    pub quality: u8,
    /// Interface that saw the network.
    pub iface: String,
    /// Whether the interface is currently associated with this network.
    pub in_use: bool,
}

/// The Wi-Fi association shown for the active interface.
///
/// SSID and signal strength only ever appear together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiLink {
    pub ssid: String,
    /// Preformatted quality, e.g. `"72%"`.
    pub signal_strength: String,
    /// Raw quality, kept for signal bar rendering.
    pub quality: u8,
}

impl From<&WifiNetwork> for WifiLink {
    fn from(network: &WifiNetwork) -> Self {
        Self {
            ssid: network.ssid.clone(),
            signal_strength: crate::format::fmt_quality(network.quality),
            quality: network.quality,
        }
    }
}

/// First scan entry seen on `iface` (exact name match).
pub fn match_wifi<'a>(networks: &'a [WifiNetwork], iface: &str) -> Option<&'a WifiNetwork> {
    networks.iter().find(|network| network.iface == iface)
}
