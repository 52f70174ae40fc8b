//! # sockrecord Core
//!
//! Core types, errors, and traits shared by the sockrecord crates.
//!
//! - **Types**: Handle pairs, cache entries, and the persisted snapshot layout
//! - **Errors**: One error enum covering config, transport, staleness, and persistence
//! - **Constants**: Well-known resource paths and sizing hints
//! - **Traits**: Handle traits and the transport seam (`ServiceConnector`)
//! - **Clock**: Injectable time source
//!
//! ## Example
//!
//! ```rust
//! use sockrecord_core::{SockRecordError, DEFAULT_CONFIG_PATH};
//!
//! let err = SockRecordError::EndpointMismatch {
//!     runtime: "unix:///run/a.sock".into(),
//!     image: "unix:///run/b.sock".into(),
//! };
//! assert!(!err.is_retryable());
//! assert!(DEFAULT_CONFIG_PATH.ends_with(".conf"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod clock;
pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use clock::{Clock, ManualClock, SystemClock};
pub use constants::*;
pub use error::{Result, SockRecordError};
pub use traits::*;
pub use types::*;
