//! Serial (UART) host port

use crate::transport::traits::{HostConnector, HostStream};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::info;

/// AT firmware default UART speed
pub const DEFAULT_BAUD: u32 = 115_200;

#[async_trait]
impl HostStream for SerialStream {
    async fn shutdown(&mut self) -> Result<()> {
        AsyncWriteExt::shutdown(self).await?;
        Ok(())
    }
}

/// Opens a serial device, e.g. "/dev/ttyUSB0"
pub struct SerialConnector {
    path: String,
    baud: u32,
}

impl SerialConnector {
    pub fn new(path: String, baud: u32) -> Self {
        Self { path, baud }
    }
}

#[async_trait]
impl HostConnector for SerialConnector {
    type Stream = SerialStream;

    async fn open(&self) -> Result<Self::Stream> {
        let stream = tokio_serial::new(&self.path, self.baud)
            .open_native_async()
            .with_context(|| format!("Failed to open serial port {}", self.path))?;
        info!("Serial port {} open at {} baud", self.path, self.baud);
        Ok(stream)
    }

    fn name(&self) -> &'static str {
        "Serial"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_device_is_error() {
        let connector = SerialConnector::new("/dev/hfpag-does-not-exist".into(), DEFAULT_BAUD);
        assert_eq!(connector.name(), "Serial");
        let err = connector.open().await.err().unwrap();
        assert!(err.to_string().contains("/dev/hfpag-does-not-exist"));
    }
}
