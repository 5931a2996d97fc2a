//! Line codec for the AT host port
//!
//! Requests are terminated by CR, LF or CRLF. Responses are always written
//! with a CRLF terminator:
//! ```text
//! AT+HFPAGINIT=1\r\n   ->   OK\r\n
//! ```

use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;

/// Default maximum request line length in bytes (terminator excluded)
pub const DEFAULT_MAX_LINE_LEN: usize = 256;

/// Response line terminator
pub const CRLF: &[u8] = b"\r\n";

/// Errors that can occur while splitting the input stream into lines
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Line too long (max: {limit} bytes)")]
    LineTooLong { limit: usize },
}

/// Encode a response line, appending CRLF
pub fn encode_line(line: &str) -> Bytes {
    let mut buf = BytesMut::with_capacity(line.len() + CRLF.len());
    buf.put_slice(line.as_bytes());
    buf.put_slice(CRLF);
    buf.freeze()
}

/// Streaming decoder that yields one request line at a time
#[derive(Debug)]
pub struct LineDecoder {
    /// Bytes received but not yet terminated
    buffer: BytesMut,
    max_line_len: usize,
    /// Set after an over-long line until its terminator arrives
    discarding: bool,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_LEN)
    }
}

impl LineDecoder {
    /// Create a new line decoder with the given line length limit
    pub fn new(max_line_len: usize) -> Self {
        Self {
            // Grows on demand up to the limit
            buffer: BytesMut::with_capacity(max_line_len.min(DEFAULT_MAX_LINE_LEN) + CRLF.len()),
            max_line_len,
            discarding: false,
        }
    }

    /// Add received data to the decoder buffer
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to decode the next line
    ///
    /// Returns:
    /// - `Ok(Some(line))` for a complete, non-empty line (terminator removed)
    /// - `Ok(None)` if more data is needed
    /// - `Err(LineTooLong)` once per over-long line; the rest of that line
    ///   up to its terminator is dropped
    ///
    /// Empty lines (such as the LF of a CRLF pair) are skipped.
    pub fn decode_next(&mut self) -> Result<Option<String>, CodecError> {
        loop {
            let terminator = self.buffer.iter().position(|b| *b == b'\r' || *b == b'\n');

            let Some(pos) = terminator else {
                if self.buffer.len() > self.max_line_len {
                    self.buffer.clear();
                    if !self.discarding {
                        self.discarding = true;
                        return Err(CodecError::LineTooLong {
                            limit: self.max_line_len,
                        });
                    }
                }
                return Ok(None);
            };

            let line = self.buffer.split_to(pos);
            self.buffer.advance(1);

            if self.discarding {
                // Tail of a line that already produced an error
                self.discarding = false;
                continue;
            }
            if line.is_empty() {
                continue;
            }
            if line.len() > self.max_line_len {
                return Err(CodecError::LineTooLong {
                    limit: self.max_line_len,
                });
            }

            return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
        }
    }

    /// Get the current buffer length (for debugging)
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_line_appends_crlf() {
        assert_eq!(&encode_line("OK")[..], b"OK\r\n");
        assert_eq!(&encode_line("")[..], b"\r\n");
    }

    #[test]
    fn test_any_terminator() {
        let mut decoder = LineDecoder::default();
        decoder.extend(b"AT\r\nAT+GMR\rAT+CMD?\n");

        assert_eq!(decoder.decode_next().unwrap().as_deref(), Some("AT"));
        assert_eq!(decoder.decode_next().unwrap().as_deref(), Some("AT+GMR"));
        assert_eq!(decoder.decode_next().unwrap().as_deref(), Some("AT+CMD?"));
        assert_eq!(decoder.decode_next().unwrap(), None);
        assert_eq!(decoder.buffer_len(), 0);
    }

    #[test]
    fn test_partial_line() {
        let mut decoder = LineDecoder::default();
        decoder.extend(b"AT+HFPAG");
        assert_eq!(decoder.decode_next().unwrap(), None);
        assert_eq!(decoder.buffer_len(), 8);

        decoder.extend(b"INIT=1\r\n");
        assert_eq!(
            decoder.decode_next().unwrap().as_deref(),
            Some("AT+HFPAGINIT=1")
        );
    }

    #[test]
    fn test_line_too_long_is_dropped() {
        let mut decoder = LineDecoder::new(8);
        decoder.extend(b"AT+0123456789");
        assert_eq!(
            decoder.decode_next(),
            Err(CodecError::LineTooLong { limit: 8 })
        );
        // Remainder of the same line is discarded without a second error
        decoder.extend(b"ABCDEFGHIJKL");
        assert_eq!(decoder.decode_next(), Ok(None));
        decoder.extend(b"XYZ\r\nAT\r\n");
        assert_eq!(decoder.decode_next().unwrap().as_deref(), Some("AT"));
    }

    #[test]
    fn test_unbounded_limit_does_not_preallocate() {
        let mut decoder = LineDecoder::new(usize::MAX);
        decoder.extend(b"AT+GMR\r\n");
        assert_eq!(decoder.decode_next(), Ok(Some("AT+GMR".to_string())));
    }

    #[test]
    fn test_terminated_line_too_long() {
        let mut decoder = LineDecoder::new(4);
        decoder.extend(b"AT+LONG\r\nAT\r\n");
        assert_eq!(
            decoder.decode_next(),
            Err(CodecError::LineTooLong { limit: 4 })
        );
        assert_eq!(decoder.decode_next().unwrap().as_deref(), Some("AT"));
    }
}
