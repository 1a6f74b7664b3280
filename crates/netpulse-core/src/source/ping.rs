// ── ICMP echo via the system ping binary ──
//
// Raw ICMP sockets need privileges the TUI rarely has; the setuid/capability
// ping binary does not.

use std::net::IpAddr;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::error::CoreError;
use crate::model::ProbeResult;

/// ping's wait flag takes whole seconds: round up, never below one.
fn wait_secs(timeout: Duration) -> u64 {
    let secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
    secs.max(1)
}

/// Outer bound on the child process, one second past what ping itself waits.
fn deadline(timeout: Duration) -> Duration {
    Duration::from_secs(wait_secs(timeout) + 1)
}

fn ping_command(target: IpAddr, timeout: Duration) -> Command {
    let mut cmd = Command::new("ping");
    let secs = wait_secs(timeout).to_string();

    if cfg!(target_os = "macos") {
        cmd.args(["-c", "1", "-t", secs.as_str()]);
    } else {
        cmd.args(["-c", "1", "-W", secs.as_str()]);
    }
    if target.is_ipv6() && cfg!(target_os = "linux") {
        cmd.arg("-6");
    }
    cmd.arg(target.to_string());
    cmd.kill_on_drop(true);
    cmd
}

/// Send one echo request. An unanswered echo is not an error; being unable
/// to run ping at all is.
pub(super) async fn probe(target: IpAddr, timeout: Duration) -> Result<ProbeResult, CoreError> {
    // ping's own wait normally expires first; this bounds a wedged binary.
    let Ok(spawned) =
        tokio::time::timeout(deadline(timeout), ping_command(target, timeout).output()).await
    else {
        debug!(%target, "ping exceeded deadline");
        return Ok(ProbeResult::unreachable());
    };
    let output = spawned.map_err(|e| CoreError::Probe {
        target: target.to_string(),
        message: format!("could not run ping: {e}"),
    })?;

    if !output.status.success() {
        debug!(%target, status = %output.status, "echo unanswered");
        return Ok(ProbeResult::unreachable());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_round_trip(&stdout).map_or_else(ProbeResult::unreachable, ProbeResult::reply))
}

/// Extract the round-trip time in milliseconds from ping's reply line
/// (`time=14.2 ms`, or `time<1ms` for sub-millisecond replies).
pub fn parse_round_trip(output: &str) -> Option<f64> {
    output.lines().find_map(|line| {
        let idx = line.find("time=").or_else(|| line.find("time<"))?;
        let value: String = line[idx + 5..]
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        value.parse().ok()
    })
}
