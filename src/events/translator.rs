//! Table-driven translation of stack events into host lines

use crate::output::Output;
use crate::stack::{EventReceiver, HfpAgStack, IndicatorStatus};
use hfpag_shared::{status, EventKind, HfpEvent, VolumeTarget};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Handler bound to one [`EventKind`]
pub type EventHandler = Box<dyn Fn(&HfpEvent) + Send + Sync>;

pub struct EventTranslator {
    handlers: HashMap<EventKind, EventHandler>,
}

impl EventTranslator {
    /// Translator with the default handler for every event kind
    pub fn new(output: Output, stack: Arc<dyn HfpAgStack>) -> Self {
        let mut translator = Self::empty();

        for kind in EventKind::ALL {
            translator.on(kind, move |_| trace!("{:?}: no action", kind));
        }

        let out = output.clone();
        translator.on(EventKind::ConnectionState, move |event| {
            if let HfpEvent::ConnectionState { state, .. } = event {
                out.write_line(&status::line(status::CONNECTION, state.code()));
            }
        });

        let out = output.clone();
        translator.on(EventKind::AudioState, move |event| {
            if let HfpEvent::AudioState { state, .. } = event {
                out.write_line(&status::line(status::AUDIO, state.code()));
            }
        });

        let out = output.clone();
        translator.on(EventKind::VolumeControl, move |event| {
            if let HfpEvent::VolumeControl { target, volume, .. } = event {
                let name = match target {
                    VolumeTarget::Microphone => status::MIC_VOLUME,
                    VolumeTarget::Speaker => status::SPEAKER_VOLUME,
                };
                out.write_line(&status::line(name, volume));
            }
        });

        let out = output;
        translator.on(EventKind::UnknownCommand, move |event| {
            if let HfpEvent::UnknownCommand { command, .. } = event {
                out.write_raw(command.clone());
            }
        });

        translator.on(EventKind::IndicatorQuery, move |event| {
            if let HfpEvent::IndicatorQuery { remote } = event {
                match stack.cind_response(remote, &IndicatorStatus::PLACEHOLDER) {
                    Ok(()) => info!("CIND response sent to {}", remote),
                    Err(e) => warn!("CIND response to {} failed: {}", remote, e),
                }
            }
        });

        translator
    }

    /// Translator with no handlers bound
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Bind `handler` to `kind`, replacing any previous binding
    pub fn on<F>(&mut self, kind: EventKind, handler: F)
    where
        F: Fn(&HfpEvent) + Send + Sync + 'static,
    {
        self.handlers.insert(kind, Box::new(handler));
    }

    pub fn handle(&self, event: &HfpEvent) {
        let kind = event.kind();
        debug!("Event: {:?}", kind);
        match self.handlers.get(&kind) {
            Some(handler) => handler(event),
            None => trace!("No handler for {:?}", kind),
        }
    }

    /// Drain `events` until every sink is dropped
    pub async fn run(self, mut events: EventReceiver) {
        while let Some(event) = events.recv().await {
            self.handle(&event);
        }
        debug!("Event channel closed");
    }
}
