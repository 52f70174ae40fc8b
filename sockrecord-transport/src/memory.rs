//! In-memory service connector.
//!
//! Fabricates handles without touching the network. Failures can be
//! scripted per endpoint, and every dial is counted, which makes it the
//! connector of choice for exercising cache behaviour.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use sockrecord_core::error::{Result, SockRecordError};
use sockrecord_core::traits::{ImageService, RuntimeService, ServiceConnector};

/// Handle produced by [`MemoryConnector`].
#[derive(Debug)]
pub struct MemoryHandle {
    endpoint: String,
    timeout: Duration,
    serial: u64,
}

impl MemoryHandle {
    /// Dial timeout the handle was created with.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sequence number of the dial that produced this handle.
    pub fn serial(&self) -> u64 {
        self.serial
    }
}

impl RuntimeService for MemoryHandle {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ImageService for MemoryHandle {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// In-memory connector.
///
/// # Thread Safety
///
/// All operations are thread-safe; failure scripts can be changed while
/// dials are in flight.
#[derive(Debug, Default)]
pub struct MemoryConnector {
    /// Endpoints whose runtime dial fails
    failing_runtime: RwLock<HashSet<String>>,
    /// Endpoints whose image dial fails
    failing_image: RwLock<HashSet<String>>,
    /// Artificial latency applied to every dial
    latency: Option<Duration>,
    runtime_dials: AtomicU64,
    image_dials: AtomicU64,
}

impl MemoryConnector {
    /// Creates a connector where every dial succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a connector that sleeps for `latency` before each dial.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Makes runtime dials to `endpoint` fail.
    pub fn fail_runtime(&self, endpoint: &str) {
        self.failing_runtime.write().insert(endpoint.to_string());
    }

    /// Makes image dials to `endpoint` fail.
    pub fn fail_image(&self, endpoint: &str) {
        self.failing_image.write().insert(endpoint.to_string());
    }

    /// Clears all scripted failures.
    pub fn heal(&self) {
        self.failing_runtime.write().clear();
        self.failing_image.write().clear();
    }

    /// Number of runtime dials attempted so far.
    pub fn runtime_dials(&self) -> u64 {
        self.runtime_dials.load(Ordering::SeqCst)
    }

    /// Number of image dials attempted so far.
    pub fn image_dials(&self) -> u64 {
        self.image_dials.load(Ordering::SeqCst)
    }

    async fn dial(
        &self,
        endpoint: &str,
        timeout: Duration,
        counter: &AtomicU64,
        failing: &RwLock<HashSet<String>>,
    ) -> Result<Arc<MemoryHandle>> {
        let serial = counter.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if failing.read().contains(endpoint) {
            return Err(SockRecordError::Connection {
                endpoint: endpoint.to_string(),
                reason: "connection refused".into(),
            });
        }

        debug!(endpoint, serial, "Fabricated in-memory handle");
        Ok(Arc::new(MemoryHandle {
            endpoint: endpoint.to_string(),
            timeout,
            serial,
        }))
    }
}

#[async_trait]
impl ServiceConnector for MemoryConnector {
    async fn connect_runtime(
        &self,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<Arc<dyn RuntimeService>> {
        let handle: Arc<dyn RuntimeService> = self
            .dial(endpoint, timeout, &self.runtime_dials, &self.failing_runtime)
            .await?;
        Ok(handle)
    }

    async fn connect_image(
        &self,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<Arc<dyn ImageService>> {
        let handle: Arc<dyn ImageService> = self
            .dial(endpoint, timeout, &self.image_dials, &self.failing_image)
            .await?;
        Ok(handle)
    }
}
