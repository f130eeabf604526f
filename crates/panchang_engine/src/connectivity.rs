use std::time::Duration;

use panchang_logging::{panchang_debug, panchang_warn};
use tokio::net::TcpStream;

/// Where and how long to probe for outbound reachability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "8.8.8.8".to_string(),
            port: 53,
            timeout: Duration::from_secs(5),
        }
    }
}

/// Single connection attempt to `host:port`. True iff it succeeds within
/// `timeout`; the connection is dropped immediately.
pub async fn is_connected(host: &str, port: u16, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(_stream)) => true,
        Ok(Err(err)) => {
            panchang_debug!("connectivity probe to {host}:{port} failed: {err}");
            false
        }
        Err(_) => {
            panchang_debug!("connectivity probe to {host}:{port} timed out after {timeout:?}");
            false
        }
    }
}

#[async_trait::async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn is_connected(&self) -> bool;
}

#[derive(Debug, Clone, Default)]
pub struct TcpProbe {
    settings: ProbeSettings,
}

impl TcpProbe {
    pub fn new(settings: ProbeSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl ConnectivityProbe for TcpProbe {
    async fn is_connected(&self) -> bool {
        if !self.settings.enabled {
            return true;
        }
        let ok = is_connected(&self.settings.host, self.settings.port, self.settings.timeout).await;
        if !ok {
            panchang_warn!(
                "No connectivity: {}:{} unreachable",
                self.settings.host,
                self.settings.port
            );
        }
        ok
    }
}
