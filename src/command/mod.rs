//! AT command infrastructure
//!
//! This module handles:
//! - Describing commands and their four handler forms
//! - Aggregating per-feature command sets into one registry
//! - Dispatching request lines to the matching handler
//! - The base, HFP-AG and I2S command sets themselves

mod descriptor;
mod dispatcher;
pub mod handlers;
mod params;
mod registry;

pub use descriptor::{CommandDescriptor, Invocation};
pub use dispatcher::Dispatcher;
pub use registry::{CommandSet, Priority, RegistryBuilder, DEFAULT_CAPACITY};

use crate::stack::StackError;
use hfpag_shared::{CommandForm, ParseError};
use thiserror::Error;

/// Why a handler refused or failed a command
///
/// Every variant is reported to the host as ERROR; the detail only reaches
/// the log.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("{form} form not supported")]
    UnsupportedForm { form: CommandForm },

    #[error("{what} out of range: {value} (allowed {min}..={max})")]
    OutOfRange {
        what: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("Stack call failed: {0}")]
    Stack(#[from] StackError),
}

impl CommandError {
    /// Range check for an integer parameter
    pub fn check_range(what: &'static str, value: i32, min: i32, max: i32) -> Result<i32, Self> {
        if (min..=max).contains(&value) {
            Ok(value)
        } else {
            Err(CommandError::OutOfRange {
                what,
                value: value.into(),
                min: min.into(),
                max: max.into(),
            })
        }
    }
}
