//! Socket-dialing service connector.
//!
//! Opens a unix domain socket or TCP connection per handle and keeps it
//! alive for as long as the handle lives. No protocol is spoken on the
//! stream; the connection only proves the endpoint is reachable.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
#[cfg(unix)]
use tokio::net::UnixStream;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use sockrecord_core::constants::{TCP_SCHEME, UNIX_SCHEME};
use sockrecord_core::error::{Result, SockRecordError};
use sockrecord_core::traits::{ImageService, RuntimeService, ServiceConnector};

/// Parsed endpoint address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Address {
    /// Unix domain socket path
    Unix(PathBuf),
    /// `host:port` TCP address
    Tcp(String),
}

impl Address {
    /// Parses `unix:///path`, `tcp://host:port`, or a bare absolute path.
    pub fn parse(endpoint: &str) -> Result<Self> {
        let endpoint = endpoint.trim();

        if let Some(path) = endpoint.strip_prefix(UNIX_SCHEME) {
            if path.is_empty() {
                return Err(SockRecordError::InvalidEndpoint(format!(
                    "missing socket path in '{}'",
                    endpoint
                )));
            }
            return Ok(Address::Unix(PathBuf::from(path)));
        }

        if let Some(host_port) = endpoint.strip_prefix(TCP_SCHEME) {
            if !host_port.contains(':') {
                return Err(SockRecordError::InvalidEndpoint(format!(
                    "missing port in '{}'",
                    endpoint
                )));
            }
            return Ok(Address::Tcp(host_port.to_string()));
        }

        if endpoint.starts_with('/') {
            return Ok(Address::Unix(PathBuf::from(endpoint)));
        }

        Err(SockRecordError::InvalidEndpoint(format!(
            "unsupported endpoint '{}'",
            endpoint
        )))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Unix(path) => write!(f, "{}{}", UNIX_SCHEME, path.display()),
            Address::Tcp(host_port) => write!(f, "{}{}", TCP_SCHEME, host_port),
        }
    }
}

#[derive(Debug)]
enum Stream {
    #[cfg(unix)]
    Unix(UnixStream),
    Tcp(TcpStream),
}

/// Handle backed by an open socket.
#[derive(Debug)]
pub struct SocketHandle {
    endpoint: String,
    address: Address,
    timeout: Duration,
    stream: Mutex<Stream>,
}

impl SocketHandle {
    /// Parsed address the socket is connected to.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Dial timeout the handle was created with.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Peer description of the open stream, for diagnostics.
    pub async fn peer(&self) -> Option<String> {
        match &*self.stream.lock().await {
            #[cfg(unix)]
            Stream::Unix(s) => s
                .peer_addr()
                .ok()
                .and_then(|a| a.as_pathname().map(|p| p.display().to_string())),
            Stream::Tcp(s) => s.peer_addr().ok().map(|a| a.to_string()),
        }
    }
}

impl RuntimeService for SocketHandle {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ImageService for SocketHandle {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Connector that dials the endpoint once per handle.
#[derive(Clone, Copy, Debug, Default)]
pub struct SocketConnector;

impl SocketConnector {
    /// Creates a socket connector.
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip(self))]
    async fn dial(&self, endpoint: &str, timeout: Duration) -> Result<Arc<SocketHandle>> {
        let address = Address::parse(endpoint)?;

        let connect = async {
            match &address {
                #[cfg(unix)]
                Address::Unix(path) => UnixStream::connect(path).await.map(Stream::Unix),
                #[cfg(not(unix))]
                Address::Unix(_) => Err(std::io::Error::new(
                    std::io::ErrorKind::Unsupported,
                    "unix sockets are not supported on this platform",
                )),
                Address::Tcp(host_port) => TcpStream::connect(host_port).await.map(Stream::Tcp),
            }
        };

        let stream = tokio::time::timeout(timeout, connect)
            .await
            .map_err(|_| SockRecordError::ConnectionTimeout {
                endpoint: endpoint.to_string(),
                timeout_ms: timeout_millis(timeout),
            })?
            .map_err(|e| SockRecordError::Connection {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;

        debug!(%address, "Connected");

        Ok(Arc::new(SocketHandle {
            endpoint: endpoint.to_string(),
            address,
            timeout,
            stream: Mutex::new(stream),
        }))
    }
}

/// Milliseconds in `timeout`, saturating at `u64::MAX`.
fn timeout_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

#[async_trait]
impl ServiceConnector for SocketConnector {
    async fn connect_runtime(
        &self,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<Arc<dyn RuntimeService>> {
        let handle: Arc<dyn RuntimeService> = self.dial(endpoint, timeout).await?;
        Ok(handle)
    }

    async fn connect_image(
        &self,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<Arc<dyn ImageService>> {
        let handle: Arc<dyn ImageService> = self.dial(endpoint, timeout).await?;
        Ok(handle)
    }
}
