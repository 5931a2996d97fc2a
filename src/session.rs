//! Host port session loop
//!
//! Reads request lines from the port one at a time, dispatches each, and
//! writes everything queued on the output channel back to the port. Handler
//! output, result codes and unsolicited event lines all take the same path,
//! so the port has exactly one writer.

use crate::command::Dispatcher;
use crate::output::{Output, OutputReceiver};
use anyhow::{Context, Result};
use hfpag_shared::codec::LineDecoder;
use hfpag_shared::ResultCode;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

/// Shared pieces every session works with
pub struct Session<'a> {
    pub dispatcher: &'a Dispatcher,
    pub output: &'a Output,
    pub max_line_len: usize,
}

impl Session<'_> {
    /// Serve one host connection until the peer closes it
    ///
    /// Output queued before the session starts is discarded, and the output
    /// handle is only attached while the session runs. Returns `Ok(())` on a
    /// clean end of stream; I/O errors end the session.
    pub async fn run<S>(&self, stream: &mut S, outbound: &mut OutputReceiver) -> Result<()>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut stale = 0;
        while outbound.try_recv().is_ok() {
            stale += 1;
        }
        if stale > 0 {
            debug!("Discarded {} stale output chunks", stale);
        }

        self.output.set_attached(true);
        let result = self.serve(stream, outbound).await;
        self.output.set_attached(false);
        result
    }

    async fn serve<S>(&self, stream: &mut S, outbound: &mut OutputReceiver) -> Result<()>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let (mut reader, mut writer) = tokio::io::split(stream);
        let mut decoder = LineDecoder::new(self.max_line_len);
        let mut read_buf = vec![0u8; 1024];

        loop {
            tokio::select! {
                // Flush queued output
                Some(chunk) = outbound.recv() => {
                    writer.write_all(&chunk).await.context("Port write failed")?;
                }

                // Read requests
                result = reader.read(&mut read_buf) => {
                    let n = result.context("Port read failed")?;
                    if n == 0 {
                        info!("Host port closed");
                        self.flush(&mut writer, outbound).await?;
                        return Ok(());
                    }
                    decoder.extend(&read_buf[..n]);
                    self.process(&mut decoder);
                }
            }
        }
    }

    /// Dispatch every complete line buffered in `decoder`
    fn process(&self, decoder: &mut LineDecoder) {
        loop {
            match decoder.decode_next() {
                Ok(Some(line)) => {
                    debug!("<- {}", line);
                    let code = self.dispatcher.dispatch(&line);
                    self.output.write_line(code.as_str());
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Dropped request: {}", e);
                    self.output.write_line(ResultCode::Error.as_str());
                }
            }
        }
    }

    /// Write out whatever is already queued
    async fn flush<W>(&self, writer: &mut W, outbound: &mut OutputReceiver) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while let Ok(chunk) = outbound.try_recv() {
            writer.write_all(&chunk).await.context("Port write failed")?;
        }
        writer.flush().await.context("Port flush failed")?;
        Ok(())
    }
}
