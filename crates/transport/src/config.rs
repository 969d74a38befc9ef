//! Connection configuration

use miio_protocol::HEADER_SIZE;
use serde::Deserialize;
use std::time::Duration;

/// Maximum inbound datagram size unless configured otherwise
pub const DEFAULT_READ_BUFFER_SIZE: usize = 4096;

/// Per-connection settings
///
/// Deserializable so callers can embed it in their own config files, e.g.
///
/// ```toml
/// [device]
/// read_buffer_size = 8192
/// handshake_ttl = 30
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionConfig {
    /// Receive buffer size in bytes; larger datagrams are rejected
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,

    /// Seconds a handshake result may be reused (unset = handshake on every write)
    #[serde(default)]
    pub handshake_ttl: Option<u64>,
}

fn default_read_buffer_size() -> usize {
    DEFAULT_READ_BUFFER_SIZE
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: default_read_buffer_size(),
            handshake_ttl: None,
        }
    }
}

impl ConnectionConfig {
    /// Set the receive buffer size
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// Enable handshake reuse for `ttl`
    pub fn with_handshake_ttl(mut self, ttl: Duration) -> Self {
        self.handshake_ttl = Some(ttl.as_secs());
        self
    }

    /// Handshake reuse window, if enabled
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.handshake_ttl
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
    }

    /// Receive buffer size, never smaller than one header
    pub fn effective_read_buffer_size(&self) -> usize {
        self.read_buffer_size.max(HEADER_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConnectionConfig::default();
        assert_eq!(config.read_buffer_size, 4096);
        assert_eq!(config.cache_ttl(), None);
    }

    #[test]
    fn test_deserialize_empty() {
        let config: ConnectionConfig = toml::from_str("").unwrap();
        assert_eq!(config, ConnectionConfig::default());
    }

    #[test]
    fn test_deserialize_values() {
        let config: ConnectionConfig = toml::from_str(
            r#"
read_buffer_size = 8192
handshake_ttl = 30
"#,
        )
        .unwrap();

        assert_eq!(config.read_buffer_size, 8192);
        assert_eq!(config.cache_ttl(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let config = ConnectionConfig::default().with_handshake_ttl(Duration::from_millis(500));
        assert_eq!(config.handshake_ttl, Some(0));
        assert_eq!(config.cache_ttl(), None);
    }

    #[test]
    fn test_buffer_clamped_to_header() {
        let config = ConnectionConfig::default().with_read_buffer_size(4);
        assert_eq!(config.effective_read_buffer_size(), HEADER_SIZE);
    }
}
