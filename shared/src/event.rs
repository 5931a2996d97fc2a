//! Events reported by the Hands-Free Audio-Gateway stack
//!
//! Numeric codes follow the stack's own enumerations so they can be written
//! to the host port unchanged.

use crate::address::BdAddr;

/// Service-level connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    SlcConnected,
    Disconnecting,
}

impl ConnectionState {
    pub fn code(self) -> u8 {
        match self {
            ConnectionState::Disconnected => 0,
            ConnectionState::Connecting => 1,
            ConnectionState::Connected => 2,
            ConnectionState::SlcConnected => 3,
            ConnectionState::Disconnecting => 4,
        }
    }
}

impl TryFrom<u8> for ConnectionState {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ConnectionState::Disconnected),
            1 => Ok(ConnectionState::Connecting),
            2 => Ok(ConnectionState::Connected),
            3 => Ok(ConnectionState::SlcConnected),
            4 => Ok(ConnectionState::Disconnecting),
            other => Err(other),
        }
    }
}

/// Audio (SCO) connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioState {
    Disconnected,
    Connecting,
    Connected,
    ConnectedMsbc,
}

impl AudioState {
    pub fn code(self) -> u8 {
        match self {
            AudioState::Disconnected => 0,
            AudioState::Connecting => 1,
            AudioState::Connected => 2,
            AudioState::ConnectedMsbc => 3,
        }
    }
}

impl TryFrom<u8> for AudioState {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(AudioState::Disconnected),
            1 => Ok(AudioState::Connecting),
            2 => Ok(AudioState::Connected),
            3 => Ok(AudioState::ConnectedMsbc),
            other => Err(other),
        }
    }
}

/// Which gain a volume event or request refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeTarget {
    Speaker,
    Microphone,
}

/// Highest volume step accepted by the hands-free unit
pub const MAX_VOLUME: u8 = 15;

/// Negotiated voice codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Cvsd,
    Msbc,
}

/// Audio packet counters for the current SCO link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PacketCounts {
    pub rx_total: u32,
    pub rx_correct: u32,
    pub rx_err: u32,
    pub rx_none: u32,
    pub rx_lost: u32,
    pub tx_total: u32,
    pub tx_discarded: u32,
}

/// Tag identifying an event without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ConnectionState,
    AudioState,
    VoiceRecognition,
    VolumeControl,
    UnknownCommand,
    IndicatorUpdate,
    IndicatorQuery,
    OperatorQuery,
    CallListQuery,
    SubscriberQuery,
    DtmfResponse,
    NoiseReductionResponse,
    AnswerResponse,
    HangupResponse,
    DialRequest,
    CodecNegotiation,
    CodecFinal,
    PacketStats,
}

impl EventKind {
    pub const ALL: [EventKind; 18] = [
        EventKind::ConnectionState,
        EventKind::AudioState,
        EventKind::VoiceRecognition,
        EventKind::VolumeControl,
        EventKind::UnknownCommand,
        EventKind::IndicatorUpdate,
        EventKind::IndicatorQuery,
        EventKind::OperatorQuery,
        EventKind::CallListQuery,
        EventKind::SubscriberQuery,
        EventKind::DtmfResponse,
        EventKind::NoiseReductionResponse,
        EventKind::AnswerResponse,
        EventKind::HangupResponse,
        EventKind::DialRequest,
        EventKind::CodecNegotiation,
        EventKind::CodecFinal,
        EventKind::PacketStats,
    ];
}

/// An event delivered by the stack callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HfpEvent {
    ConnectionState {
        remote: BdAddr,
        state: ConnectionState,
        peer_features: u32,
        chld_features: u32,
    },
    AudioState {
        remote: BdAddr,
        state: AudioState,
    },
    VoiceRecognition {
        remote: BdAddr,
        active: bool,
    },
    VolumeControl {
        remote: BdAddr,
        target: VolumeTarget,
        volume: u8,
    },
    /// AT command from the hands-free unit the stack does not understand
    UnknownCommand {
        remote: BdAddr,
        command: String,
    },
    IndicatorUpdate {
        remote: BdAddr,
    },
    /// AT+CIND? from the hands-free unit
    IndicatorQuery {
        remote: BdAddr,
    },
    OperatorQuery {
        remote: BdAddr,
    },
    CallListQuery {
        remote: BdAddr,
    },
    SubscriberQuery {
        remote: BdAddr,
    },
    DtmfResponse {
        remote: BdAddr,
        code: String,
    },
    NoiseReductionResponse {
        remote: BdAddr,
        enabled: bool,
    },
    AnswerResponse {
        remote: BdAddr,
    },
    HangupResponse {
        remote: BdAddr,
    },
    /// `None` redials the last number
    DialRequest {
        remote: BdAddr,
        number: Option<String>,
    },
    CodecNegotiation {
        remote: BdAddr,
        wideband: bool,
    },
    CodecFinal {
        remote: BdAddr,
        codec: Codec,
    },
    PacketStats {
        counts: PacketCounts,
    },
}

impl HfpEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            HfpEvent::ConnectionState { .. } => EventKind::ConnectionState,
            HfpEvent::AudioState { .. } => EventKind::AudioState,
            HfpEvent::VoiceRecognition { .. } => EventKind::VoiceRecognition,
            HfpEvent::VolumeControl { .. } => EventKind::VolumeControl,
            HfpEvent::UnknownCommand { .. } => EventKind::UnknownCommand,
            HfpEvent::IndicatorUpdate { .. } => EventKind::IndicatorUpdate,
            HfpEvent::IndicatorQuery { .. } => EventKind::IndicatorQuery,
            HfpEvent::OperatorQuery { .. } => EventKind::OperatorQuery,
            HfpEvent::CallListQuery { .. } => EventKind::CallListQuery,
            HfpEvent::SubscriberQuery { .. } => EventKind::SubscriberQuery,
            HfpEvent::DtmfResponse { .. } => EventKind::DtmfResponse,
            HfpEvent::NoiseReductionResponse { .. } => EventKind::NoiseReductionResponse,
            HfpEvent::AnswerResponse { .. } => EventKind::AnswerResponse,
            HfpEvent::HangupResponse { .. } => EventKind::HangupResponse,
            HfpEvent::DialRequest { .. } => EventKind::DialRequest,
            HfpEvent::CodecNegotiation { .. } => EventKind::CodecNegotiation,
            HfpEvent::CodecFinal { .. } => EventKind::CodecFinal,
            HfpEvent::PacketStats { .. } => EventKind::PacketStats,
        }
    }

    /// Remote device the event refers to, if the stack reports one
    pub fn remote(&self) -> Option<BdAddr> {
        match self {
            HfpEvent::ConnectionState { remote, .. }
            | HfpEvent::AudioState { remote, .. }
            | HfpEvent::VoiceRecognition { remote, .. }
            | HfpEvent::VolumeControl { remote, .. }
            | HfpEvent::UnknownCommand { remote, .. }
            | HfpEvent::IndicatorUpdate { remote }
            | HfpEvent::IndicatorQuery { remote }
            | HfpEvent::OperatorQuery { remote }
            | HfpEvent::CallListQuery { remote }
            | HfpEvent::SubscriberQuery { remote }
            | HfpEvent::DtmfResponse { remote, .. }
            | HfpEvent::NoiseReductionResponse { remote, .. }
            | HfpEvent::AnswerResponse { remote }
            | HfpEvent::HangupResponse { remote }
            | HfpEvent::DialRequest { remote, .. }
            | HfpEvent::CodecNegotiation { remote, .. }
            | HfpEvent::CodecFinal { remote, .. } => Some(*remote),
            HfpEvent::PacketStats { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_codes_roundtrip() {
        for code in 0..=4u8 {
            assert_eq!(ConnectionState::try_from(code).unwrap().code(), code);
        }
        assert_eq!(ConnectionState::try_from(5), Err(5));

        for code in 0..=3u8 {
            assert_eq!(AudioState::try_from(code).unwrap().code(), code);
        }
        assert_eq!(AudioState::try_from(4), Err(4));
    }

    #[test]
    fn test_kind_and_remote() {
        let remote = BdAddr::new([1, 2, 3, 4, 5, 6]);
        let event = HfpEvent::AudioState {
            remote,
            state: AudioState::Connected,
        };
        assert_eq!(event.kind(), EventKind::AudioState);
        assert_eq!(event.remote(), Some(remote));

        let stats = HfpEvent::PacketStats {
            counts: PacketCounts::default(),
        };
        assert_eq!(stats.kind(), EventKind::PacketStats);
        assert_eq!(stats.remote(), None);
    }
}
