//! Handle pair returned by the transport for one endpoint.

use std::sync::Arc;

use crate::traits::{ImageService, RuntimeService};

/// Runtime and image handles established against the same endpoint.
///
/// Cloning is cheap and shares the underlying handles.
#[derive(Clone, Debug)]
pub struct HandlePair {
    runtime: Arc<dyn RuntimeService>,
    image: Arc<dyn ImageService>,
}

impl HandlePair {
    /// Pairs a runtime and an image handle.
    pub fn new(runtime: Arc<dyn RuntimeService>, image: Arc<dyn ImageService>) -> Self {
        Self { runtime, image }
    }

    /// The runtime service handle.
    pub fn runtime(&self) -> &Arc<dyn RuntimeService> {
        &self.runtime
    }

    /// The image service handle.
    pub fn image(&self) -> &Arc<dyn ImageService> {
        &self.image
    }

    /// Splits the pair into its two handles.
    pub fn into_parts(self) -> (Arc<dyn RuntimeService>, Arc<dyn ImageService>) {
        (self.runtime, self.image)
    }

    /// Returns true if both handles are the very same objects as `other`'s.
    pub fn shares_handles_with(&self, other: &HandlePair) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.runtime), Arc::as_ptr(&other.runtime))
            && std::ptr::addr_eq(Arc::as_ptr(&self.image), Arc::as_ptr(&other.image))
    }
}
