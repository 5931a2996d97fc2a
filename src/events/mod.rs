//! Stack event handling
//!
//! Events queued by the stack callback are drained on their own task and
//! turned into unsolicited lines on the host port.

mod translator;

pub use translator::EventTranslator;
