// ── Linux interface state from /sys/class/net ──
//
// sysinfo knows names, addresses and counters but not link state or link
// type, and its interface map is unordered. sysfs supplies all three.

use std::path::Path;

use tokio::fs;

use crate::error::CoreError;
use crate::model::{InterfaceKind, OperState};

pub(super) const SYSFS_NET: &str = "/sys/class/net";

/// Link metadata for one interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct SysfsLink {
    pub name: String,
    pub ifindex: u32,
    pub oper_state: OperState,
    pub kind: InterfaceKind,
}

/// Read every interface under `root`, ordered by ifindex.
pub(super) async fn read_links(root: &Path) -> Result<Vec<SysfsLink>, CoreError> {
    let mut entries = fs::read_dir(root)
        .await
        .map_err(|e| CoreError::InterfaceQuery {
            message: format!("cannot read {}: {e}", root.display()),
        })?;

    let mut links = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| CoreError::InterfaceQuery {
            message: format!("cannot list {}: {e}", root.display()),
        })?
    {
        let name = entry.file_name().to_string_lossy().into_owned();
        let dir = entry.path();

        let ifindex = read_trimmed(&dir.join("ifindex"))
            .await
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(u32::MAX);
        let oper_state = read_trimmed(&dir.join("operstate"))
            .await
            .map_or(OperState::Unknown, |raw| OperState::parse_lossy(&raw));
        let kind = link_kind(&dir).await;

        links.push(SysfsLink {
            name,
            ifindex,
            oper_state,
            kind,
        });
    }

    links.sort_by(|a, b| a.ifindex.cmp(&b.ifindex).then_with(|| a.name.cmp(&b.name)));
    Ok(links)
}

async fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .await
        .ok()
        .map(|raw| raw.trim().to_owned())
}

async fn link_kind(dir: &Path) -> InterfaceKind {
    let wireless = fs::try_exists(dir.join("wireless")).await.unwrap_or(false)
        || fs::try_exists(dir.join("phy80211")).await.unwrap_or(false);
    if wireless {
        return InterfaceKind::Wireless;
    }

    // /sys/class/net entries are symlinks into /sys/devices; software
    // interfaces (bridges, veths, tunnels, lo) live under devices/virtual.
    let is_virtual = fs::read_link(dir)
        .await
        .is_ok_and(|target| target.to_string_lossy().contains("devices/virtual/"));
    if is_virtual {
        InterfaceKind::Virtual
    } else {
        InterfaceKind::Wired
    }
}
