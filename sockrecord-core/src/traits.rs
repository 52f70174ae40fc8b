//! Common traits for sockrecord.
//!
//! The cache never looks inside a handle. It only needs to know which
//! endpoint a handle was dialed against (for snapshots) and how to ask a
//! transport for new handles.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

// ═══════════════════════════════════════════════════════════════════════════════
// HANDLE TRAITS
// ═══════════════════════════════════════════════════════════════════════════════

/// A connected runtime service client.
pub trait RuntimeService: fmt::Debug + Send + Sync {
    /// Endpoint this handle was established against.
    fn endpoint(&self) -> &str;
}

/// A connected image service client.
pub trait ImageService: fmt::Debug + Send + Sync {
    /// Endpoint this handle was established against.
    fn endpoint(&self) -> &str;
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSPORT TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for establishing service handles.
///
/// Implementations might:
/// - Dial a unix socket or TCP address (see `sockrecord-transport`)
/// - Fabricate in-memory handles (for testing/development)
///
/// Failures are returned as-is; the cache passes them through to its caller
/// without inspecting them.
#[async_trait]
pub trait ServiceConnector: Send + Sync {
    /// Establishes a runtime service handle for `endpoint`.
    async fn connect_runtime(
        &self,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<Arc<dyn RuntimeService>>;

    /// Establishes an image service handle for `endpoint`.
    async fn connect_image(
        &self,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<Arc<dyn ImageService>>;
}

#[async_trait]
impl<C: ServiceConnector + ?Sized> ServiceConnector for Arc<C> {
    async fn connect_runtime(
        &self,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<Arc<dyn RuntimeService>> {
        (**self).connect_runtime(endpoint, timeout).await
    }

    async fn connect_image(
        &self,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<Arc<dyn ImageService>> {
        (**self).connect_image(endpoint, timeout).await
    }
}
