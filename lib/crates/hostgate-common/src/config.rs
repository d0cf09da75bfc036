use serde::Deserialize;
use std::net::SocketAddr;

/// Gateway server configuration.
///
/// Loaded by the server binary from `HOSTGATE_*` environment variables;
/// every field has a default except the optional TLS pair.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Listen address (default: 0.0.0.0:5000)
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Reject a second target registered under an address that is already
    /// present. Off by default: duplicates are accepted and lookups return
    /// the earliest registration.
    #[serde(default)]
    pub unique_addresses: bool,

    /// Path to TLS certificate (enables HTTPS when set together with `tls_key`).
    #[serde(default)]
    pub tls_cert: Option<String>,

    /// Path to TLS private key.
    #[serde(default)]
    pub tls_key: Option<String>,
}

impl GatewayConfig {
    /// Certificate and key paths, only when both are configured.
    pub fn tls_paths(&self) -> Option<(&str, &str)> {
        match (&self.tls_cert, &self.tls_key) {
            (Some(cert), Some(key)) => Some((cert.as_str(), key.as_str())),
            _ => None,
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            unique_addresses: false,
            tls_cert: None,
            tls_key: None,
        }
    }
}
