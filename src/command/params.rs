//! Typed parameter access for handlers
//!
//! Wraps [`ParamList`] so that every failed extraction also writes a
//! diagnostic line to the host port before the error is returned.

use crate::output::Output;
use hfpag_shared::{BdAddr, ParamList, ParseError};
use tracing::debug;

pub struct Params<'a> {
    list: ParamList<'a>,
    output: &'a Output,
}

impl<'a> Params<'a> {
    pub fn new(args: &'a str, output: &'a Output) -> Self {
        Self {
            list: ParamList::new(args),
            output,
        }
    }

    pub fn get_digit(&self, index: usize) -> Result<i32, ParseError> {
        self.list.digit(index).map_err(|e| self.diagnose(e))
    }

    pub fn get_string(&self, index: usize) -> Result<&'a str, ParseError> {
        self.list.string(index).map_err(|e| self.diagnose(e))
    }

    pub fn get_address(&self, index: usize) -> Result<BdAddr, ParseError> {
        self.list.address(index).map_err(|e| self.diagnose(e))
    }

    fn diagnose(&self, err: ParseError) -> ParseError {
        debug!("Parameter rejected: {}", err);
        self.output.write_line(&format!("Could not parse: {}", err));
        err
    }
}
