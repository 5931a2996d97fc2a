//! Vendor stack seam
//!
//! The HFP profile engine and the I2S driver live outside this crate. Command
//! handlers and the event translator only see the traits below; on a host
//! build they are backed by the simulated implementations in [`sim`].

pub mod i2s;
pub mod sim;
mod traits;

pub use i2s::{I2sChannelConfig, I2sPins, I2sRole};
pub use sim::{SimHfpAg, SimI2s};
pub use traits::{EventReceiver, EventSink, HfpAgStack, I2sDriver, IndicatorStatus, StackError};
