//! HFP-AG Gateway Shared Protocol Types
//!
//! This crate provides the wire-level pieces of the AT host interface:
//! the line codec, command line syntax, parameter parsing, hardware
//! addresses and the event records reported by the Bluetooth stack.

pub mod address;
pub mod codec;
pub mod event;
pub mod params;
pub mod syntax;

pub use address::{AddressError, BdAddr};
pub use event::{
    AudioState, Codec, ConnectionState, EventKind, HfpEvent, PacketCounts, VolumeTarget,
};
pub use params::{ParamList, ParseError};
pub use syntax::{CommandForm, CommandLine, SyntaxError};

use std::fmt;

/// Final result code of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Ok,
    Error,
}

impl ResultCode {
    /// Text written to the host port, terminator excluded
    pub fn as_str(self) -> &'static str {
        match self {
            ResultCode::Ok => "OK",
            ResultCode::Error => "ERROR",
        }
    }

    pub fn is_ok(self) -> bool {
        self == ResultCode::Ok
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<T, E> From<&Result<T, E>> for ResultCode {
    fn from(result: &Result<T, E>) -> Self {
        if result.is_ok() {
            ResultCode::Ok
        } else {
            ResultCode::Error
        }
    }
}

/// Outbound status line names
pub mod status {
    pub const CONNECTION: &str = "+HFPAGCONNECTSTS";
    pub const AUDIO: &str = "+HFPAGAUDIOSTS";
    pub const MIC_VOLUME: &str = "+HFPAGMICVOLSTS";
    pub const SPEAKER_VOLUME: &str = "+HFPAGSPKVOLSTS";

    /// Format an asynchronous status line, terminator excluded
    pub fn line(name: &str, value: impl std::fmt::Display) -> String {
        format!("AT{name}={value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_code_text() {
        assert_eq!(ResultCode::Ok.to_string(), "OK");
        assert_eq!(ResultCode::Error.as_str(), "ERROR");
    }

    #[test]
    fn test_result_code_from_result() {
        let ok: Result<(), ()> = Ok(());
        let err: Result<(), ()> = Err(());
        assert_eq!(ResultCode::from(&ok), ResultCode::Ok);
        assert_eq!(ResultCode::from(&err), ResultCode::Error);
    }

    #[test]
    fn test_status_line() {
        assert_eq!(status::line(status::CONNECTION, 2), "AT+HFPAGCONNECTSTS=2");
        assert_eq!(status::line(status::SPEAKER_VOLUME, 15), "AT+HFPAGSPKVOLSTS=15");
    }
}
