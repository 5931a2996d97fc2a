//! Simulated stack and driver
//!
//! Stand-ins for the vendor SDK so the gateway runs on a development host.
//! They keep just enough state to report believable connection and audio
//! events, record every call, and can be told to fail the next request.

use super::i2s::{I2sChannelConfig, SignalRoute};
use super::traits::{EventSink, HfpAgStack, I2sDriver, IndicatorStatus, StackError};
use hfpag_shared::{AudioState, BdAddr, ConnectionState, HfpEvent, VolumeTarget};
use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// Most recent requests kept in the call history
pub const CALL_HISTORY: usize = 256;

/// A request issued to the simulated HFP-AG stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackCall {
    RegisterCallback,
    Init,
    Deinit,
    SlcConnect(BdAddr),
    SlcDisconnect(BdAddr),
    AudioConnect(BdAddr),
    AudioDisconnect(BdAddr),
    VolumeControl(BdAddr, VolumeTarget, u8),
    CindResponse(BdAddr, IndicatorStatus),
}

#[derive(Debug, Default)]
struct HfpState {
    initialized: bool,
    sink: Option<EventSink>,
    slc: HashSet<BdAddr>,
    audio: HashSet<BdAddr>,
    calls: VecDeque<StackCall>,
    fail_next: Option<StackError>,
}

/// Simulated HFP Audio-Gateway
#[derive(Debug, Default)]
pub struct SimHfpAg {
    state: Mutex<HfpState>,
}

impl SimHfpAg {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, HfpState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record `call`, apply any injected failure, then run `op` on the state
    ///
    /// Events returned by `op` are emitted after the lock is released.
    fn request<F>(&self, call: StackCall, op: F) -> Result<(), StackError>
    where
        F: FnOnce(&mut HfpState) -> Result<Vec<HfpEvent>, StackError>,
    {
        let (events, sink) = {
            let mut state = self.state();
            debug!("[SIM] {:?}", call);
            state.record(call);
            if let Some(err) = state.fail_next.take() {
                return Err(err);
            }
            (op(&mut *state)?, state.sink.clone())
        };

        if let Some(sink) = sink {
            for event in events {
                sink.emit(event);
            }
        }
        Ok(())
    }
}

/// Inspection and fault injection for tests
#[cfg(test)]
impl SimHfpAg {
    /// Make the next request fail with `err`
    pub fn fail_next(&self, err: StackError) {
        self.state().fail_next = Some(err);
    }

    /// Recent requests, oldest first, at most [`CALL_HISTORY`]
    pub fn calls(&self) -> Vec<StackCall> {
        self.state().calls.iter().cloned().collect()
    }

    /// Deliver an event as if the hands-free unit caused it
    pub fn inject(&self, event: HfpEvent) {
        let sink = self.state().sink.clone();
        if let Some(sink) = sink {
            sink.emit(event);
        }
    }
}

impl HfpState {
    fn record(&mut self, call: StackCall) {
        if self.calls.len() == CALL_HISTORY {
            self.calls.pop_front();
        }
        self.calls.push_back(call);
    }
}

fn require_init(state: &HfpState) -> Result<(), StackError> {
    if state.initialized {
        Ok(())
    } else {
        Err(StackError::NotInitialized)
    }
}

fn connection(remote: BdAddr, state: ConnectionState) -> HfpEvent {
    HfpEvent::ConnectionState {
        remote,
        state,
        peer_features: 0,
        chld_features: 0,
    }
}

impl HfpAgStack for SimHfpAg {
    fn register_callback(&self, sink: EventSink) {
        let mut state = self.state();
        state.record(StackCall::RegisterCallback);
        state.sink = Some(sink);
    }

    fn init(&self) -> Result<(), StackError> {
        self.request(StackCall::Init, |state| {
            state.initialized = true;
            info!("[SIM] HFP-AG initialized");
            Ok(Vec::new())
        })
    }

    fn deinit(&self) -> Result<(), StackError> {
        self.request(StackCall::Deinit, |state| {
            require_init(state)?;
            state.initialized = false;
            state.slc.clear();
            state.audio.clear();
            info!("[SIM] HFP-AG deinitialized");
            Ok(Vec::new())
        })
    }

    fn slc_connect(&self, remote: &BdAddr) -> Result<(), StackError> {
        let remote = *remote;
        self.request(StackCall::SlcConnect(remote), |state| {
            require_init(state)?;
            if !state.slc.insert(remote) {
                return Err(StackError::Busy);
            }
            Ok(vec![
                connection(remote, ConnectionState::Connecting),
                connection(remote, ConnectionState::Connected),
                connection(remote, ConnectionState::SlcConnected),
            ])
        })
    }

    fn slc_disconnect(&self, remote: &BdAddr) -> Result<(), StackError> {
        let remote = *remote;
        self.request(StackCall::SlcDisconnect(remote), |state| {
            require_init(state)?;
            if !state.slc.remove(&remote) {
                return Err(StackError::NotConnected(remote));
            }
            let mut events = Vec::new();
            if state.audio.remove(&remote) {
                events.push(HfpEvent::AudioState {
                    remote,
                    state: AudioState::Disconnected,
                });
            }
            events.push(connection(remote, ConnectionState::Disconnecting));
            events.push(connection(remote, ConnectionState::Disconnected));
            Ok(events)
        })
    }

    fn audio_connect(&self, remote: &BdAddr) -> Result<(), StackError> {
        let remote = *remote;
        self.request(StackCall::AudioConnect(remote), |state| {
            require_init(state)?;
            if !state.slc.contains(&remote) {
                return Err(StackError::NotConnected(remote));
            }
            if !state.audio.insert(remote) {
                return Err(StackError::Busy);
            }
            Ok(vec![
                HfpEvent::AudioState {
                    remote,
                    state: AudioState::Connecting,
                },
                HfpEvent::AudioState {
                    remote,
                    state: AudioState::Connected,
                },
            ])
        })
    }

    fn audio_disconnect(&self, remote: &BdAddr) -> Result<(), StackError> {
        let remote = *remote;
        self.request(StackCall::AudioDisconnect(remote), |state| {
            require_init(state)?;
            if !state.audio.remove(&remote) {
                return Err(StackError::NotConnected(remote));
            }
            Ok(vec![HfpEvent::AudioState {
                remote,
                state: AudioState::Disconnected,
            }])
        })
    }

    fn volume_control(
        &self,
        remote: &BdAddr,
        target: VolumeTarget,
        volume: u8,
    ) -> Result<(), StackError> {
        let remote = *remote;
        self.request(StackCall::VolumeControl(remote, target, volume), |state| {
            require_init(state)?;
            if !state.slc.contains(&remote) {
                return Err(StackError::NotConnected(remote));
            }
            Ok(Vec::new())
        })
    }

    fn cind_response(&self, remote: &BdAddr, status: &IndicatorStatus) -> Result<(), StackError> {
        let remote = *remote;
        self.request(StackCall::CindResponse(remote, *status), |state| {
            require_init(state)?;
            Ok(Vec::new())
        })
    }
}

#[derive(Debug, Default)]
struct I2sState {
    configs: Vec<I2sChannelConfig>,
    routes: Vec<SignalRoute>,
    fail_next: Option<StackError>,
}

/// Simulated I2S peripheral and GPIO matrix
#[derive(Debug, Default)]
pub struct SimI2s {
    state: Mutex<I2sState>,
}

impl SimI2s {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, I2sState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
impl SimI2s {
    /// Make the next `configure` fail with `err`
    pub fn fail_next(&self, err: StackError) {
        self.state().fail_next = Some(err);
    }

    /// Successfully applied channel configurations
    pub fn configs(&self) -> Vec<I2sChannelConfig> {
        self.state().configs.clone()
    }

    /// GPIO matrix connections made so far
    pub fn routes(&self) -> Vec<SignalRoute> {
        self.state().routes.clone()
    }
}

impl I2sDriver for SimI2s {
    fn configure(&self, config: &I2sChannelConfig) -> Result<(), StackError> {
        let mut state = self.state();
        if let Some(err) = state.fail_next.take() {
            return Err(err);
        }
        info!(
            "[SIM] I2S{} {:?} {} Hz enabled",
            config.controller, config.role, config.sample_rate_hz
        );
        state.configs.push(config.clone());
        Ok(())
    }

    fn route_signal(&self, route: SignalRoute) {
        debug!("[SIM] GPIO route {:?}", route);
        self.state().routes.push(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEER: BdAddr = BdAddr::new([1, 2, 3, 4, 5, 6]);

    fn initialized() -> (SimHfpAg, crate::stack::EventReceiver) {
        let stack = SimHfpAg::new();
        let (sink, events) = EventSink::channel();
        stack.register_callback(sink);
        stack.init().unwrap();
        (stack, events)
    }

    #[test]
    fn test_requires_init() {
        let stack = SimHfpAg::new();
        assert_eq!(stack.slc_connect(&PEER), Err(StackError::NotInitialized));
        assert_eq!(stack.calls(), vec![StackCall::SlcConnect(PEER)]);
    }

    #[test]
    fn test_connect_reports_states() {
        let (stack, mut events) = initialized();
        stack.slc_connect(&PEER).unwrap();

        let states: Vec<_> = std::iter::from_fn(|| events.try_recv().ok()).collect();
        assert_eq!(
            states,
            vec![
                connection(PEER, ConnectionState::Connecting),
                connection(PEER, ConnectionState::Connected),
                connection(PEER, ConnectionState::SlcConnected),
            ]
        );
    }

    #[test]
    fn test_audio_needs_slc() {
        let (stack, _events) = initialized();
        assert_eq!(stack.audio_connect(&PEER), Err(StackError::NotConnected(PEER)));
        stack.slc_connect(&PEER).unwrap();
        assert_eq!(stack.audio_connect(&PEER), Ok(()));
        assert_eq!(stack.audio_connect(&PEER), Err(StackError::Busy));
    }

    #[test]
    fn test_disconnect_tears_down_audio() {
        let (stack, mut events) = initialized();
        stack.slc_connect(&PEER).unwrap();
        stack.audio_connect(&PEER).unwrap();
        while events.try_recv().is_ok() {}

        stack.slc_disconnect(&PEER).unwrap();
        let first = events.try_recv().unwrap();
        assert_eq!(
            first,
            HfpEvent::AudioState {
                remote: PEER,
                state: AudioState::Disconnected
            }
        );
    }

    #[test]
    fn test_fail_next_is_one_shot() {
        let (stack, _events) = initialized();
        stack.fail_next(StackError::Failed(-1));
        assert_eq!(stack.slc_connect(&PEER), Err(StackError::Failed(-1)));
        assert_eq!(stack.slc_connect(&PEER), Ok(()));
    }

    #[test]
    fn test_call_history_is_bounded() {
        let stack = SimHfpAg::new();
        for _ in 0..CALL_HISTORY + 10 {
            let _ = stack.slc_disconnect(&PEER);
        }
        stack.register_callback(EventSink::channel().0);

        let calls = stack.calls();
        assert_eq!(calls.len(), CALL_HISTORY);
        assert_eq!(calls.last(), Some(&StackCall::RegisterCallback));
    }

    #[test]
    fn test_inject_reaches_registered_sink() {
        let (stack, mut events) = initialized();
        stack.inject(HfpEvent::IndicatorQuery { remote: PEER });
        assert_eq!(
            events.try_recv().unwrap(),
            HfpEvent::IndicatorQuery { remote: PEER }
        );
        // Injection is not a request
        assert_eq!(stack.calls(), vec![StackCall::RegisterCallback, StackCall::Init]);
    }

    #[test]
    fn test_i2s_records_config() {
        use crate::stack::i2s::{I2sPins, I2sRole};

        let driver = SimI2s::new();
        let pins = I2sPins {
            bclk: 1,
            ws: 2,
            dout: 3,
            din: 4,
        };
        driver.fail_next(StackError::Busy);
        let config = I2sChannelConfig::pcm(I2sRole::Slave, 8000, pins);
        assert_eq!(driver.configure(&config), Err(StackError::Busy));
        assert!(driver.configs().is_empty());

        driver.configure(&config).unwrap();
        assert_eq!(driver.configs(), vec![config]);
    }
}
