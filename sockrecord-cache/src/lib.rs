//! Reuse cache for runtime and image service handles.
//!
//! [`ServiceRecord`] hands out a previously established handle pair when it
//! is still fresh enough for the caller, and dials new handles the first
//! time an endpoint is seen. [`SharedServiceRecord`] wraps it for callers on
//! several tasks.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod config;
mod record;
mod shared;
mod validity;

pub use config::RecordConfig;
pub use record::{RecordStats, ServiceRecord};
pub use shared::SharedServiceRecord;
pub use validity::is_valid;
