//! Outbound side of the host port
//!
//! Command handlers and the event translator run on different tasks but
//! share one output stream. Every write is queued as a complete chunk onto a
//! channel that a single session task drains, so lines never interleave.
//! While no session is attached, writes are dropped.

use bytes::Bytes;
use hfpag_shared::codec::encode_line;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::trace;

/// Receiving end drained by the session writer
pub type OutputReceiver = mpsc::UnboundedReceiver<Bytes>;

/// Cloneable handle for writing to the host port
#[derive(Debug, Clone)]
pub struct Output {
    tx: mpsc::UnboundedSender<Bytes>,
    /// Shared by every clone
    attached: Arc<AtomicBool>,
}

impl Output {
    /// Create an output handle and the receiver that feeds the port writer
    ///
    /// The handle starts attached.
    pub fn channel() -> (Self, OutputReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let output = Self {
            tx,
            attached: Arc::new(AtomicBool::new(true)),
        };
        (output, rx)
    }

    /// Accept or drop writes on this handle and all its clones
    pub fn set_attached(&self, attached: bool) {
        self.attached.store(attached, Ordering::Release);
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    /// Write one line, CRLF appended
    pub fn write_line(&self, line: &str) {
        self.write_raw(encode_line(line));
    }

    /// Write bytes exactly as given
    pub fn write_raw(&self, data: impl Into<Bytes>) {
        if !self.is_attached() {
            trace!("Output dropped: no host attached");
            return;
        }
        if self.tx.send(data.into()).is_err() {
            trace!("Output dropped: port writer closed");
        }
    }
}

#[cfg(test)]
pub(crate) fn drain(rx: &mut OutputReceiver) -> String {
    let mut text = String::new();
    while let Ok(chunk) = rx.try_recv() {
        text.push_str(&String::from_utf8_lossy(&chunk));
    }
    text
}
