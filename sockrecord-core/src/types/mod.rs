//! Domain types for sockrecord.
//!
//! - [`HandlePair`]: Runtime + image handle established for one endpoint
//! - [`CacheEntry`]: Handle pair with its activity timestamp and validity window
//! - [`RecordSnapshot`]: Serializable view of the whole cache

mod entry;
mod handles;

pub use entry::*;
pub use handles::*;
