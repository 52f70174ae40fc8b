//! # sockrecord Transport
//!
//! Implementations of [`ServiceConnector`](sockrecord_core::ServiceConnector):
//!
//! - **Memory**: Fabricated handles with scriptable failures, for development and testing
//! - **Socket**: Dials `unix://` and `tcp://` endpoints with a timeout
//!
//! ## Example
//!
//! ```rust,ignore
//! use sockrecord_core::ServiceConnector;
//! use sockrecord_transport::SocketConnector;
//!
//! let connector = SocketConnector::new();
//! let runtime = connector
//!     .connect_runtime("unix:///run/containerd/containerd.sock", Duration::from_secs(2))
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod memory;
mod socket;

pub use memory::{MemoryConnector, MemoryHandle};
pub use socket::{Address, SocketConnector, SocketHandle};
