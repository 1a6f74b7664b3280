//! Configuration for netpulse.
//!
//! Built-in defaults, an optional TOML file and `NETPULSE_*` environment
//! overrides, merged with figment and validated into a
//! [`netpulse_core::MonitorConfig`].

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use netpulse_core::MonitorConfig;
use netpulse_core::config::{DEFAULT_INTERVAL, DEFAULT_PROBE_TARGET, DEFAULT_PROBE_TIMEOUT};

/// Prefix for environment overrides. Nested keys are joined with `__`.
pub const ENV_PREFIX: &str = "NETPULSE_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub monitor: MonitorSection,
}

/// The `[monitor]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MonitorSection {
    /// Milliseconds between automatic poll cycles.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Address pinged for latency.
    #[serde(default = "default_probe_target")]
    pub probe_target: String,

    /// Milliseconds to wait for an echo reply.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            probe_target: default_probe_target(),
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }
}

fn default_interval_ms() -> u64 {
    millis(DEFAULT_INTERVAL)
}
fn default_probe_target() -> String {
    DEFAULT_PROBE_TARGET.to_string()
}
fn default_probe_timeout_ms() -> u64 {
    millis(DEFAULT_PROBE_TIMEOUT)
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl Config {
    /// Validate and convert into the monitor's runtime configuration.
    pub fn to_monitor_config(&self) -> Result<MonitorConfig, ConfigError> {
        let section = &self.monitor;

        if section.interval_ms == 0 {
            return Err(ConfigError::Validation {
                field: "monitor.interval_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if section.probe_timeout_ms == 0 {
            return Err(ConfigError::Validation {
                field: "monitor.probe_timeout_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }
        let probe_target: IpAddr =
            section
                .probe_target
                .trim()
                .parse()
                .map_err(|_| ConfigError::Validation {
                    field: "monitor.probe_target".into(),
                    reason: format!("not an IP address: '{}'", section.probe_target),
                })?;

        Ok(MonitorConfig {
            interval: Duration::from_millis(section.interval_ms),
            probe_target,
            probe_timeout: Duration::from_millis(section.probe_timeout_ms),
        })
    }

    /// Render as pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "netpulse", "netpulse").map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("netpulse");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from defaults, `path` (or [`config_path`]) and the
/// environment. A missing file is not an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_convert_to_core_defaults() {
        let config = Config::default().to_monitor_config().unwrap();
        assert_eq!(config, MonitorConfig::default());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut config = Config::default();
        config.monitor.interval_ms = 0;
        let err = config.to_monitor_config().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid monitor.interval_ms: must be greater than zero"
        );
    }

    #[test]
    fn zero_probe_timeout_is_rejected() {
        let mut config = Config::default();
        config.monitor.probe_timeout_ms = 0;
        assert!(matches!(
            config.to_monitor_config(),
            Err(ConfigError::Validation { field, .. }) if field == "monitor.probe_timeout_ms"
        ));
    }

    #[test]
    fn probe_target_must_be_an_address() {
        let mut config = Config::default();
        config.monitor.probe_target = "dns.google".into();
        assert!(matches!(
            config.to_monitor_config(),
            Err(ConfigError::Validation { field, .. }) if field == "monitor.probe_target"
        ));

        config.monitor.probe_target = "2001:4860:4860::8888".into();
        let monitor = config.to_monitor_config().unwrap();
        assert!(monitor.probe_target.is_ipv6());
    }

    #[test]
    fn config_path_ends_in_config_toml() {
        assert!(config_path().ends_with("config.toml"));
    }
}
