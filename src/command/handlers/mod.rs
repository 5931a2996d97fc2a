//! Feature command sets

mod base;
mod hfp_ag;
mod i2s;

pub use base::{BaseCommands, GATEWAY_VERSION};
pub use hfp_ag::HfpAgCommands;
pub use i2s::I2sCommands;
