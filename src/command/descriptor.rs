//! Command descriptors
//!
//! One descriptor per AT command name, holding up to four handlers. A form
//! the command does not implement is bound to [`FormHandler::Unrecognized`],
//! which fails with [`CommandError::UnsupportedForm`] so the host always gets
//! an explicit ERROR.

use super::params::Params;
use super::registry::Registry;
use super::CommandError;
use crate::output::Output;
use hfpag_shared::CommandForm;
use std::fmt;
use std::sync::Arc;

/// Everything a handler gets to see for one command line
pub struct Invocation<'a> {
    pub name: &'a str,
    pub form: CommandForm,
    /// Empty unless `form` is [`CommandForm::Setup`]
    pub params: Params<'a>,
    pub output: &'a Output,
    pub registry: &'a Registry,
}

pub type HandlerFn = dyn Fn(&Invocation<'_>) -> Result<(), CommandError> + Send + Sync;

/// The handler bound to one form of a command
#[derive(Clone)]
pub enum FormHandler {
    /// Sentinel for forms the command does not implement
    Unrecognized,
    Handler(Arc<HandlerFn>),
}

impl FormHandler {
    pub fn invoke(&self, invocation: &Invocation<'_>) -> Result<(), CommandError> {
        match self {
            FormHandler::Unrecognized => Err(CommandError::UnsupportedForm {
                form: invocation.form,
            }),
            FormHandler::Handler(handler) => handler(invocation),
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, FormHandler::Handler(_))
    }
}

impl fmt::Debug for FormHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormHandler::Unrecognized => write!(f, "Unrecognized"),
            FormHandler::Handler(_) => write!(f, "Handler"),
        }
    }
}

/// Name plus the test / query / setup / execute handlers of one command
#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    name: &'static str,
    test: FormHandler,
    query: FormHandler,
    setup: FormHandler,
    execute: FormHandler,
}

impl CommandDescriptor {
    /// A descriptor with every form unrecognized
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            test: FormHandler::Unrecognized,
            query: FormHandler::Unrecognized,
            setup: FormHandler::Unrecognized,
            execute: FormHandler::Unrecognized,
        }
    }

    pub fn with_test<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> Result<(), CommandError> + Send + Sync + 'static,
    {
        self.test = FormHandler::Handler(Arc::new(handler));
        self
    }

    pub fn with_query<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> Result<(), CommandError> + Send + Sync + 'static,
    {
        self.query = FormHandler::Handler(Arc::new(handler));
        self
    }

    pub fn with_setup<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> Result<(), CommandError> + Send + Sync + 'static,
    {
        self.setup = FormHandler::Handler(Arc::new(handler));
        self
    }

    pub fn with_execute<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> Result<(), CommandError> + Send + Sync + 'static,
    {
        self.execute = FormHandler::Handler(Arc::new(handler));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Handler for `form`, possibly the sentinel
    pub fn handler(&self, form: CommandForm) -> &FormHandler {
        match form {
            CommandForm::Test => &self.test,
            CommandForm::Query => &self.query,
            CommandForm::Setup => &self.setup,
            CommandForm::Execute => &self.execute,
        }
    }

    pub fn supports(&self, form: CommandForm) -> bool {
        self.handler(form).is_supported()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_descriptor_supports_nothing() {
        let descriptor = CommandDescriptor::new("+X");
        for form in [
            CommandForm::Test,
            CommandForm::Query,
            CommandForm::Setup,
            CommandForm::Execute,
        ] {
            assert!(!descriptor.supports(form));
        }
    }

    #[test]
    fn test_builder_binds_forms() {
        let descriptor = CommandDescriptor::new("+X")
            .with_setup(|_| Ok(()))
            .with_execute(|_| Ok(()));
        assert_eq!(descriptor.name(), "+X");
        assert!(descriptor.supports(CommandForm::Setup));
        assert!(descriptor.supports(CommandForm::Execute));
        assert!(!descriptor.supports(CommandForm::Query));
        assert!(!descriptor.supports(CommandForm::Test));
    }
}
