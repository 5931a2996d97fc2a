//! TCP host port for running the gateway on a development machine
//!
//! The listener accepts one client per session; the next client is accepted
//! once the current session ends.

use crate::transport::traits::{HostConnector, HostStream};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::net::SocketAddr;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::OnceCell;
use tracing::info;

#[async_trait]
impl HostStream for TcpStream {
    async fn shutdown(&mut self) -> Result<()> {
        AsyncWriteExt::shutdown(self).await?;
        Ok(())
    }
}

/// Listens on a local address and hands out one client at a time
pub struct TcpListenConnector {
    address: String,
    listener: OnceCell<TcpListener>,
}

impl TcpListenConnector {
    pub fn new(address: String) -> Self {
        Self {
            address,
            listener: OnceCell::new(),
        }
    }

    /// Bind now instead of on the first [`open`](HostConnector::open)
    pub async fn bind(&self) -> Result<SocketAddr> {
        let listener = self.listener().await?;
        Ok(listener.local_addr()?)
    }

    async fn listener(&self) -> Result<&TcpListener> {
        self.listener
            .get_or_try_init(|| async {
                let listener = TcpListener::bind(&self.address)
                    .await
                    .with_context(|| format!("Failed to bind {}", self.address))?;
                info!("Host port listening on {}", listener.local_addr()?);
                Ok::<_, anyhow::Error>(listener)
            })
            .await
    }
}

#[async_trait]
impl HostConnector for TcpListenConnector {
    type Stream = TcpStream;

    async fn open(&self) -> Result<Self::Stream> {
        let (stream, peer) = self.listener().await?.accept().await?;
        info!("Host connected from {}", peer);
        Ok(stream)
    }

    fn name(&self) -> &'static str {
        "TCP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[test]
    fn test_connector_name() {
        let connector = TcpListenConnector::new("127.0.0.1:0".into());
        assert_eq!(connector.name(), "TCP");
    }

    #[tokio::test]
    async fn test_accepts_client() {
        let connector = TcpListenConnector::new("127.0.0.1:0".into());
        let addr = connector.bind().await.unwrap();

        let client = tokio::spawn(async move {
            let mut client = TcpStream::connect(addr).await.unwrap();
            client.write_all(b"AT\r\n").await.unwrap();
        });

        let mut stream = connector.open().await.unwrap();
        let mut buf = [0u8; 4];
        stream.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"AT\r\n");
        client.await.unwrap();
    }

    #[tokio::test]
    async fn test_bind_failure_has_context() {
        let connector = TcpListenConnector::new("not-an-address".into());
        let err = connector.bind().await.err().unwrap();
        assert!(err.to_string().contains("not-an-address"));
    }
}
