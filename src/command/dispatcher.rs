//! Command dispatcher - matches request lines to registry entries

use super::descriptor::Invocation;
use super::params::Params;
use super::registry::Registry;
use super::CommandError;
use crate::output::Output;
use hfpag_shared::{CommandForm, CommandLine, ResultCode, SyntaxError};
use thiserror::Error;
use tracing::{debug, warn};

/// Reasons a request line ends in ERROR
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("Unknown command: {0:?}")]
    UnknownCommand(String),

    #[error("AT{name} ({form}): {source}")]
    Command {
        name: String,
        form: CommandForm,
        #[source]
        source: CommandError,
    },
}

/// Routes each request line to the handler its suffix form selects
pub struct Dispatcher {
    registry: Registry,
    output: Output,
}

impl Dispatcher {
    pub fn new(registry: Registry, output: Output) -> Self {
        Self { registry, output }
    }

    /// Run one line and return its final result code
    ///
    /// Output produced by the handler is already queued when this returns;
    /// the caller writes the result code after it.
    pub fn dispatch(&self, line: &str) -> ResultCode {
        match self.execute(line) {
            Ok(()) => {
                debug!("{} -> OK", line);
                ResultCode::Ok
            }
            Err(e) => {
                warn!("{} -> ERROR: {}", line, e);
                ResultCode::Error
            }
        }
    }

    /// Like [`dispatch`](Self::dispatch) but keeps the failure cause
    pub fn execute(&self, line: &str) -> Result<(), DispatchError> {
        let command = CommandLine::parse(line)?;

        let descriptor = self
            .registry
            .find(command.name)
            .ok_or_else(|| DispatchError::UnknownCommand(command.name.to_string()))?;

        let invocation = Invocation {
            name: command.name,
            form: command.form,
            params: Params::new(command.args, &self.output),
            output: &self.output,
            registry: &self.registry,
        };

        descriptor
            .handler(command.form)
            .invoke(&invocation)
            .map_err(|source| DispatchError::Command {
                name: command.name.to_string(),
                form: command.form,
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandDescriptor;
    use crate::output::drain;

    fn dispatcher() -> (Dispatcher, crate::output::OutputReceiver) {
        let (output, rx) = Output::channel();
        let mut registry = Registry::with_capacity(8);
        registry
            .register(
                CommandDescriptor::new("+ECHO")
                    .with_setup(|inv| {
                        let text = inv.params.get_string(0)?;
                        inv.output.write_line(text);
                        Ok(())
                    })
                    .with_query(|inv| {
                        inv.output.write_line("+ECHO:query");
                        Ok(())
                    })
                    .with_test(|inv| {
                        inv.output.write_line("+ECHO:test");
                        Ok(())
                    }),
            )
            .unwrap();
        registry
            .register(CommandDescriptor::new("+SETONLY").with_setup(|_| Ok(())))
            .unwrap();
        (Dispatcher::new(registry, output), rx)
    }

    #[test]
    fn test_each_form_reaches_its_handler() {
        let (dispatcher, mut rx) = dispatcher();

        assert_eq!(dispatcher.dispatch("AT+ECHO=\"hi\""), ResultCode::Ok);
        assert_eq!(dispatcher.dispatch("AT+ECHO?"), ResultCode::Ok);
        assert_eq!(dispatcher.dispatch("AT+ECHO=?"), ResultCode::Ok);
        assert_eq!(drain(&mut rx), "hi\r\n+ECHO:query\r\n+ECHO:test\r\n");
    }

    #[test]
    fn test_unknown_command_is_error() {
        let (dispatcher, _rx) = dispatcher();
        assert_eq!(dispatcher.dispatch("AT+NOPE=1"), ResultCode::Error);
        assert!(matches!(
            dispatcher.execute("AT+NOPE"),
            Err(DispatchError::UnknownCommand(name)) if name == "+NOPE"
        ));
        // Name match is exact
        assert_eq!(dispatcher.dispatch("AT+echo?"), ResultCode::Error);
    }

    #[test]
    fn test_unsupported_form_is_error() {
        let (dispatcher, _rx) = dispatcher();
        assert_eq!(dispatcher.dispatch("AT+SETONLY?"), ResultCode::Error);
        assert_eq!(dispatcher.dispatch("AT+SETONLY"), ResultCode::Error);
        assert_eq!(dispatcher.dispatch("AT+SETONLY=?"), ResultCode::Error);
        assert!(matches!(
            dispatcher.execute("AT+ECHO"),
            Err(DispatchError::Command {
                source: CommandError::UnsupportedForm {
                    form: CommandForm::Execute
                },
                ..
            })
        ));
    }

    #[test]
    fn test_missing_prefix_is_error() {
        let (dispatcher, _rx) = dispatcher();
        assert_eq!(dispatcher.dispatch("+ECHO?"), ResultCode::Error);
        assert!(matches!(
            dispatcher.execute("hello"),
            Err(DispatchError::Syntax(SyntaxError::MissingPrefix))
        ));
    }

    #[test]
    fn test_parse_failure_is_error_with_diagnostic() {
        let (dispatcher, mut rx) = dispatcher();
        assert_eq!(dispatcher.dispatch("AT+ECHO="), ResultCode::Error);
        assert!(drain(&mut rx).starts_with("Could not parse:"));
    }
}
