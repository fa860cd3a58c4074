//! Discovery configuration surface.
//!
//! `DiscoverySettings` is the raw, serde-friendly shape a host reads from
//! its settings file; `CoordinatorConfig` is the validated, immutable form
//! the coordinator is constructed with. Validation failures are
//! construction-time errors — there is no runtime reconfiguration path.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default UDP discovery port
pub const DISCOVERY_PORT: u16 = 9999;

/// All-ones broadcast address used when no target is configured.
pub const DEFAULT_BROADCAST_TARGET: &str = "255.255.255.255";

/// Raw discovery settings as read from the host's settings file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySettings {
    /// Master switch. When false the host never constructs a coordinator.
    pub aggressive: bool,

    /// Discovery target: a unicast address, a subnet broadcast address, or
    /// a comma-separated list of either.
    pub broadcast_target: String,

    /// UDP port probes are sent to.
    pub port: u16,

    /// Minimum seconds between discovery rounds (gate threshold; also the
    /// natural tick cadence).
    pub min_interval_secs: u64,

    /// Probe datagrams sent per round, per target.
    pub packets_per_round: u32,

    /// Seconds to collect replies after the probes are sent.
    pub response_window_secs: u64,

    /// When true, skip rounds while no consumer is registered.
    pub require_active_consumers: bool,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            aggressive: true,
            broadcast_target: DEFAULT_BROADCAST_TARGET.to_string(),
            port: DISCOVERY_PORT,
            min_interval_secs: 10,
            packets_per_round: 3,
            response_window_secs: 5,
            require_active_consumers: false,
        }
    }
}

/// Validated, immutable coordinator configuration.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub targets: Vec<SocketAddr>,
    pub packets_per_round: u32,
    pub min_interval: Duration,
    pub response_window: Duration,
    pub require_active_consumers: bool,
}

impl CoordinatorConfig {
    /// Validate raw settings into a coordinator configuration.
    ///
    /// Note this does not consult `settings.aggressive`; deciding whether to
    /// construct a coordinator at all is the host's call.
    pub fn from_settings(settings: &DiscoverySettings) -> Result<Self, ConfigError> {
        if settings.packets_per_round < 1 {
            return Err(ConfigError::InvalidPacketCount);
        }

        let mut targets = Vec::new();
        for token in settings.broadcast_target.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let ip: IpAddr = token
                .parse()
                .map_err(|_| ConfigError::InvalidTarget(token.to_string()))?;
            targets.push(SocketAddr::new(ip, settings.port));
        }
        if targets.is_empty() {
            return Err(ConfigError::InvalidTarget(settings.broadcast_target.clone()));
        }

        Ok(Self {
            targets,
            packets_per_round: settings.packets_per_round,
            min_interval: Duration::from_secs(settings.min_interval_secs),
            response_window: Duration::from_secs(settings.response_window_secs),
            require_active_consumers: settings.require_active_consumers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_validate() {
        let settings = DiscoverySettings::default();
        let config = CoordinatorConfig::from_settings(&settings).unwrap();

        assert_eq!(config.targets, vec!["255.255.255.255:9999".parse().unwrap()]);
        assert_eq!(config.packets_per_round, 3);
        assert_eq!(config.min_interval, Duration::from_secs(10));
        assert!(!config.require_active_consumers);
    }

    #[test]
    fn test_target_list_is_split() {
        let settings = DiscoverySettings {
            broadcast_target: "192.168.1.255, 10.0.0.255".to_string(),
            port: 9999,
            ..Default::default()
        };
        let config = CoordinatorConfig::from_settings(&settings).unwrap();

        assert_eq!(
            config.targets,
            vec![
                "192.168.1.255:9999".parse().unwrap(),
                "10.0.0.255:9999".parse().unwrap(),
            ]
        );
    }

    #[test]
    fn test_invalid_target_rejected() {
        let settings = DiscoverySettings {
            broadcast_target: "not-an-address".to_string(),
            ..Default::default()
        };
        let err = CoordinatorConfig::from_settings(&settings).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTarget(t) if t == "not-an-address"));
    }

    #[test]
    fn test_empty_target_rejected() {
        let settings = DiscoverySettings {
            broadcast_target: " , ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            CoordinatorConfig::from_settings(&settings),
            Err(ConfigError::InvalidTarget(_))
        ));
    }

    #[test]
    fn test_zero_packets_rejected() {
        let settings = DiscoverySettings {
            packets_per_round: 0,
            ..Default::default()
        };
        assert!(matches!(
            CoordinatorConfig::from_settings(&settings),
            Err(ConfigError::InvalidPacketCount)
        ));
    }

    #[test]
    fn test_settings_roundtrip_json() {
        let settings = DiscoverySettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: DiscoverySettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.broadcast_target, DEFAULT_BROADCAST_TARGET);
        assert!(parsed.aggressive);
    }
}
