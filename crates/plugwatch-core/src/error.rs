//! Error types for plugwatch core.

use std::net::SocketAddr;

use thiserror::Error;

/// Core error type for shared operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Transport-level discovery errors.
///
/// These are always recoverable: a failed round is treated as a round that
/// produced zero replies, and the next tick retries normally.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Failed to open discovery socket: {0}")]
    Bind(#[source] std::io::Error),

    #[error("Failed to send probe to {target}: {source}")]
    Send {
        target: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration errors, surfaced at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid broadcast target: {0}")]
    InvalidTarget(String),

    #[error("packets_per_round must be at least 1")]
    InvalidPacketCount,
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_error_display() {
        let err = DiscoveryError::Bind(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert!(format!("{}", err).contains("discovery socket"));
    }

    #[test]
    fn test_core_error_from_config_error() {
        let err = CoreError::Config(ConfigError::InvalidPacketCount);
        assert!(format!("{}", err).contains("at least 1"));
    }

    #[test]
    fn test_invalid_target_carries_input() {
        let err = ConfigError::InvalidTarget("not-an-address".to_string());
        assert!(format!("{}", err).contains("not-an-address"));
    }
}
