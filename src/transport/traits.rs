//! Host port abstraction for pluggable byte transports

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

/// A host port that can read and write bytes
#[async_trait]
pub trait HostStream: AsyncRead + AsyncWrite + Send + Unpin + 'static {
    /// Close the port gracefully
    async fn shutdown(&mut self) -> Result<()>;
}

/// Factory for host port sessions
#[async_trait]
pub trait HostConnector: Send + Sync {
    /// The stream type this connector produces
    type Stream: HostStream;

    /// Wait for the port to become available and open it
    async fn open(&self) -> Result<Self::Stream>;

    /// Human-readable name for this transport
    fn name(&self) -> &'static str;
}
