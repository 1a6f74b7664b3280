// ── Wi-Fi scanning via NetworkManager's nmcli ──

use std::io::ErrorKind;

use tokio::process::Command;
use tracing::debug;

use crate::error::CoreError;
use crate::model::WifiNetwork;

const NMCLI_ARGS: &[&str] = &[
    "-t",
    "-f",
    "IN-USE,SSID,SIGNAL,DEVICE",
    "device",
    "wifi",
    "list",
    "--rescan",
    "no",
];

/// nmcli exit status for "NetworkManager is not running".
const NM_NOT_RUNNING: i32 = 8;

/// List visible networks, associated ones first.
///
/// Hosts without nmcli or without a running NetworkManager simply have no
/// visible networks.
pub(super) async fn scan() -> Result<Vec<WifiNetwork>, CoreError> {
    let output = match Command::new("nmcli").args(NMCLI_ARGS).output().await {
        Ok(output) => output,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("nmcli not installed; skipping wifi scan");
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(CoreError::WifiScan {
                message: format!("could not run nmcli: {e}"),
            });
        }
    };

    if !output.status.success() {
        if output.status.code() == Some(NM_NOT_RUNNING) {
            debug!("NetworkManager not running; skipping wifi scan");
            return Ok(Vec::new());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = match stderr.trim() {
            "" => format!("nmcli exited with {}", output.status),
            reason => reason.to_owned(),
        };
        return Err(CoreError::WifiScan { message });
    }

    let mut networks = parse_wifi_list(&String::from_utf8_lossy(&output.stdout));
    // Stable: keeps nmcli's ordering within each group.
    networks.sort_by_key(|network| !network.in_use);
    Ok(networks)
}

/// Parse `nmcli -t -f IN-USE,SSID,SIGNAL,DEVICE device wifi list` output.
///
/// Lines that do not carry four fields or a numeric signal are skipped.
/// Hidden networks (empty SSID) are skipped as well.
pub fn parse_wifi_list(output: &str) -> Vec<WifiNetwork> {
    output
        .lines()
        .filter_map(|line| {
            let fields = split_terse(line);
            let [in_use, ssid, signal, device] = fields.as_slice() else {
                return None;
            };
            if ssid.is_empty() {
                return None;
            }
            let quality = signal.trim().parse::<u8>().ok()?.min(100);
            Some(WifiNetwork {
                ssid: ssid.clone(),
                quality,
                iface: device.clone(),
                in_use: in_use.trim() == "*",
            })
        })
        .collect()
}

/// Split one terse-mode line on unescaped `:`, unescaping `\:` and `\\`.
fn split_terse(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            ':' => fields.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    fields.push(current);
    fields
}
