//! Network reachability probes, consulted once per search.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tracing::debug;

use crate::config::{ConnectivityConfig, ProbeKind};

/// Reports whether the outside network is reachable.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn is_network_reachable(&self) -> bool;
}

/// Probe that always answers yes.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysReachable;

#[async_trait]
impl ConnectivityProbe for AlwaysReachable {
    async fn is_network_reachable(&self) -> bool {
        true
    }
}

/// Probe that opens (and drops) a TCP connection to a known host.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    timeout: Duration,
}

impl TcpProbe {
    /// `host` is `name:port`.
    pub fn new(host: impl Into<String>, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ConnectivityProbe for TcpProbe {
    async fn is_network_reachable(&self) -> bool {
        match tokio::time::timeout(self.timeout, TcpStream::connect(&self.host)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                debug!("Connectivity probe to {} failed: {}", self.host, e);
                false
            }
            Err(_) => {
                debug!(
                    "Connectivity probe to {} timed out after {:?}",
                    self.host, self.timeout
                );
                false
            }
        }
    }
}

/// Create a probe from configuration.
pub fn create_probe(config: &ConnectivityConfig) -> Arc<dyn ConnectivityProbe> {
    match config.probe {
        ProbeKind::Always => Arc::new(AlwaysReachable),
        ProbeKind::Tcp => Arc::new(TcpProbe::new(
            config.host.clone(),
            Duration::from_millis(config.timeout_ms),
        )),
    }
}
