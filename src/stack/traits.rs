//! Seams to the vendor Bluetooth stack and audio driver
//!
//! Both are synchronous: a call returns once the request has been accepted.
//! Completion of connect/disconnect requests is only observable through a
//! later [`HfpEvent`] delivered to the registered [`EventSink`].

use hfpag_shared::{BdAddr, HfpEvent, VolumeTarget};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::trace;

use super::i2s::{I2sChannelConfig, SignalRoute};

/// Failures reported by the stack or driver
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StackError {
    #[error("Profile not initialized")]
    NotInitialized,

    #[error("Remote device not connected: {0}")]
    NotConnected(BdAddr),

    #[error("Stack busy")]
    Busy,

    #[error("Call failed with code {0}")]
    Failed(i32),
}

/// Receiving end of the stack event queue
pub type EventReceiver = mpsc::UnboundedReceiver<HfpEvent>;

/// Callback target the stack delivers events to
///
/// Events are queued for the translator task, so emitting never blocks the
/// stack's own context.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<HfpEvent>,
}

impl EventSink {
    /// Create a sink and the receiver the translator drains
    pub fn channel() -> (Self, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn emit(&self, event: HfpEvent) {
        if let Err(e) = self.tx.send(event) {
            trace!("Event dropped, translator gone: {:?}", e.0.kind());
        }
    }
}

/// Current call state indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    NoCalls,
    InProgress,
}

/// Call setup indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallSetupStatus {
    Idle,
    Incoming,
    OutgoingDialing,
    OutgoingAlerting,
}

/// Network service indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkState {
    Unavailable,
    Available,
}

/// Roaming indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoamingStatus {
    Inactive,
    Active,
}

/// Held call indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallHeldStatus {
    None,
    HeldAndActive,
    HeldNoActive,
}

/// Answer to a hands-free unit's indicator query (`AT+CIND?`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorStatus {
    pub call: CallStatus,
    pub call_setup: CallSetupStatus,
    pub network: NetworkState,
    /// 0..=5
    pub signal: u8,
    pub roaming: RoamingStatus,
    /// 0..=5
    pub battery: u8,
    pub call_held: CallHeldStatus,
}

impl IndicatorStatus {
    /// Fixed values reported while no telephony backend is attached
    pub const PLACEHOLDER: Self = Self {
        call: CallStatus::NoCalls,
        call_setup: CallSetupStatus::Idle,
        network: NetworkState::Available,
        signal: 5,
        roaming: RoamingStatus::Inactive,
        battery: 5,
        call_held: CallHeldStatus::None,
    };
}

impl Default for IndicatorStatus {
    fn default() -> Self {
        Self::PLACEHOLDER
    }
}

/// Hands-Free Profile Audio-Gateway stack
pub trait HfpAgStack: Send + Sync {
    /// Replace the event callback target
    fn register_callback(&self, sink: EventSink);

    fn init(&self) -> Result<(), StackError>;

    fn deinit(&self) -> Result<(), StackError>;

    /// Open a service-level connection
    fn slc_connect(&self, remote: &BdAddr) -> Result<(), StackError>;

    fn slc_disconnect(&self, remote: &BdAddr) -> Result<(), StackError>;

    /// Open the audio (SCO) link
    fn audio_connect(&self, remote: &BdAddr) -> Result<(), StackError>;

    fn audio_disconnect(&self, remote: &BdAddr) -> Result<(), StackError>;

    /// Set the remote speaker or microphone gain, `0..=15`
    fn volume_control(
        &self,
        remote: &BdAddr,
        target: VolumeTarget,
        volume: u8,
    ) -> Result<(), StackError>;

    /// Answer an indicator query
    fn cind_response(&self, remote: &BdAddr, status: &IndicatorStatus) -> Result<(), StackError>;
}

/// I2S peripheral plus the GPIO signal matrix
pub trait I2sDriver: Send + Sync {
    /// Allocate a TX/RX channel pair, put both in standard mode and enable them
    fn configure(&self, config: &I2sChannelConfig) -> Result<(), StackError>;

    /// Attach a peripheral signal to a GPIO
    fn route_signal(&self, route: SignalRoute);
}
