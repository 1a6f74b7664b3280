#![allow(clippy::unwrap_used)]
// Integration tests for config loading. `figment::Jail` gives each test its
// own working directory and serializes environment changes.

use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::time::Duration;

use figment::Jail;
use pretty_assertions::assert_eq;

use netpulse_config::{Config, ConfigError, MonitorSection, load_config};

fn load(path: &str) -> Result<Config, figment::Error> {
    load_config(Some(Path::new(path))).map_err(|e| figment::Error::from(e.to_string()))
}

#[test]
fn test_missing_file_yields_defaults() {
    Jail::expect_with(|_jail| {
        let config = load("absent.toml")?;
        assert_eq!(config, Config::default());
        assert_eq!(config.monitor.interval_ms, 2000);
        assert_eq!(config.monitor.probe_target, "8.8.8.8");
        assert_eq!(config.monitor.probe_timeout_ms, 1000);
        Ok(())
    });
}

#[test]
fn test_file_overrides_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
                [monitor]
                interval_ms = 5000
                probe_target = "1.1.1.1"
            "#,
        )?;

        let config = load("config.toml")?;
        assert_eq!(
            config.monitor,
            MonitorSection {
                interval_ms: 5000,
                probe_target: "1.1.1.1".into(),
                probe_timeout_ms: 1000,
            }
        );
        Ok(())
    });
}

#[test]
fn test_env_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[monitor]\ninterval_ms = 5000\n")?;
        jail.set_env("NETPULSE_MONITOR__INTERVAL_MS", "500");
        jail.set_env("NETPULSE_MONITOR__PROBE_TARGET", "9.9.9.9");

        let monitor = load("config.toml")?
            .to_monitor_config()
            .map_err(|e| e.to_string())?;
        assert_eq!(monitor.interval, Duration::from_millis(500));
        assert_eq!(
            monitor.probe_target,
            IpAddr::V4(Ipv4Addr::new(9, 9, 9, 9))
        );
        assert_eq!(monitor.probe_timeout, Duration::from_secs(1));
        Ok(())
    });
}

#[test]
fn test_malformed_file_is_a_load_error() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[monitor]\ninterval_ms = \"soon\"\n")?;

        let err = load_config(Some(Path::new("config.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Figment(_)));
        Ok(())
    });
}

#[test]
fn test_invalid_values_fail_validation() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[monitor]\nprobe_target = \"not-an-ip\"\n")?;

        let config = load("config.toml")?;
        let err = config.to_monitor_config().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid monitor.probe_target: not an IP address: 'not-an-ip'"
        );
        Ok(())
    });
}

#[test]
fn test_toml_round_trips_through_loader() {
    Jail::expect_with(|jail| {
        let mut config = Config::default();
        config.monitor.interval_ms = 750;
        jail.create_file("config.toml", &config.to_toml().unwrap())?;

        assert_eq!(load("config.toml")?, config);
        Ok(())
    });
}
