//! Mock connectivity probe for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::connectivity::ConnectivityProbe;

/// Probe whose answer is set by the test. Reachable by default.
#[derive(Debug)]
pub struct MockConnectivity {
    reachable: AtomicBool,
    probes: AtomicUsize,
}

impl Default for MockConnectivity {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnectivity {
    pub fn new() -> Self {
        Self {
            reachable: AtomicBool::new(true),
            probes: AtomicUsize::new(0),
        }
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// How many times the probe was consulted.
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectivityProbe for MockConnectivity {
    async fn is_network_reachable(&self) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.reachable.load(Ordering::SeqCst)
    }
}
