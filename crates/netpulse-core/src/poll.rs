// ── One poll cycle ──
//
// Strictly sequential: interfaces → Wi-Fi → throughput → probe. Only the
// throughput read has a fallback, whatever its error; any other failing
// query aborts the whole cycle.

use std::net::IpAddr;

use tracing::{debug, warn};

use crate::error::CoreError;
use crate::format;
use crate::model::{NetworkSnapshot, Throughput, WifiLink, match_wifi, select_active_interface};
use crate::source::NetworkSource;

/// Message shown when a failure carries no text of its own.
pub const GENERIC_ERROR: &str = "An error occurred";

/// Run one poll cycle against `source`, probing `target` for latency.
pub async fn poll_cycle<S: NetworkSource>(
    source: &S,
    target: IpAddr,
) -> Result<NetworkSnapshot, CoreError> {
    let interfaces = source.interfaces().await?;
    let active = select_active_interface(&interfaces);
    debug!(active = active.map(|i| i.name.as_str()), "selected active interface");

    let wifi_networks = source.wifi_networks().await?;
    let wifi = active
        .and_then(|iface| match_wifi(&wifi_networks, &iface.name))
        .map(WifiLink::from);

    let rates = source
        .throughput(active.map(|i| i.name.as_str()))
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "throughput read failed; reporting zero");
            Throughput::default()
        });

    let probe = source.probe(target).await?;

    Ok(NetworkSnapshot {
        download_speed: format::fmt_speed(rates.rx_bytes_per_sec),
        upload_speed: format::fmt_speed(rates.tx_bytes_per_sec),
        latency: format::fmt_latency(&probe),
        network_type: format::fmt_network_type(active.map(|i| i.kind)),
        ip_address: format::fmt_ip(active.and_then(|i| i.ipv4)),
        wifi,
    })
}

/// Display text for a failed cycle.
pub fn error_message(err: &CoreError) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        GENERIC_ERROR.into()
    } else {
        message
    }
}
