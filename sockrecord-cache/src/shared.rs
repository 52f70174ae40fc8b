//! Task-safe wrapper around [`ServiceRecord`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use sockrecord_core::error::Result;
use sockrecord_core::traits::ServiceConnector;
use sockrecord_core::types::{HandlePair, RecordSnapshot};

use crate::config::RecordConfig;
use crate::record::{RecordStats, ServiceRecord};

/// [`ServiceRecord`] behind an async mutex.
///
/// A lookup holds the lock for its whole check-dial-insert sequence, so two
/// tasks asking for the same unknown endpoint produce one entry, not two.
/// Cloning shares the same cache.
pub struct SharedServiceRecord<C> {
    inner: Arc<Mutex<ServiceRecord<C>>>,
}

impl<C> Clone for SharedServiceRecord<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: ServiceConnector> SharedServiceRecord<C> {
    /// Creates a shared cache; see [`ServiceRecord::new`].
    pub async fn new(config: RecordConfig, connector: C) -> Self {
        Self::from_record(ServiceRecord::new(config, connector).await)
    }

    /// Wraps an existing cache.
    pub fn from_record(record: ServiceRecord<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(record)),
        }
    }

    /// See [`ServiceRecord::resolve_or_create`].
    pub async fn resolve_or_create(
        &self,
        runtime_endpoint: &str,
        image_endpoint: &str,
        required_freshness: Duration,
    ) -> Result<HandlePair> {
        self.inner
            .lock()
            .await
            .resolve_or_create(runtime_endpoint, image_endpoint, required_freshness)
            .await
    }

    /// Saves a snapshot taken under the lock.
    pub async fn save_service(&self) -> Result<()> {
        self.inner.lock().await.save_service().await
    }

    /// See [`ServiceRecord::snapshot`].
    pub async fn snapshot(&self) -> RecordSnapshot {
        self.inner.lock().await.snapshot()
    }

    /// See [`ServiceRecord::stats`].
    pub async fn stats(&self) -> RecordStats {
        self.inner.lock().await.stats()
    }
}
