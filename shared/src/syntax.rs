//! AT command line syntax
//!
//! ```text
//! AT<name>=?       test
//! AT<name>?        query
//! AT<name>=<args>  setup
//! AT<name>         execute
//! ```
//!
//! `<name>` keeps its leading `+` (`+HFPAGINIT`); a bare `AT` has an empty
//! name and addresses the base command.

use thiserror::Error;

/// Errors in the overall shape of a command line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("line does not start with AT")]
    MissingPrefix,
}

/// Which of the four handlers a line addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandForm {
    Test,
    Query,
    Setup,
    Execute,
}

impl std::fmt::Display for CommandForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandForm::Test => write!(f, "test"),
            CommandForm::Query => write!(f, "query"),
            CommandForm::Setup => write!(f, "setup"),
            CommandForm::Execute => write!(f, "execute"),
        }
    }
}

/// A command line split into name, form and raw arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine<'a> {
    pub name: &'a str,
    pub form: CommandForm,
    /// Raw argument text; empty for every form except setup
    pub args: &'a str,
}

impl<'a> CommandLine<'a> {
    /// Split a request line (terminator already removed)
    pub fn parse(line: &'a str) -> Result<Self, SyntaxError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let body = line.strip_prefix("AT").ok_or(SyntaxError::MissingPrefix)?;

        if let Some((name, args)) = body.split_once('=') {
            if args == "?" {
                return Ok(Self {
                    name,
                    form: CommandForm::Test,
                    args: "",
                });
            }
            return Ok(Self {
                name,
                form: CommandForm::Setup,
                args,
            });
        }

        if let Some(name) = body.strip_suffix('?') {
            return Ok(Self {
                name,
                form: CommandForm::Query,
                args: "",
            });
        }

        Ok(Self {
            name: body,
            form: CommandForm::Execute,
            args: "",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forms() {
        let line = CommandLine::parse("AT+HFPAGINIT=?").unwrap();
        assert_eq!((line.name, line.form), ("+HFPAGINIT", CommandForm::Test));

        let line = CommandLine::parse("AT+HFPAGINIT?").unwrap();
        assert_eq!((line.name, line.form), ("+HFPAGINIT", CommandForm::Query));

        let line = CommandLine::parse("AT+HFPAGINIT=1").unwrap();
        assert_eq!(line.name, "+HFPAGINIT");
        assert_eq!(line.form, CommandForm::Setup);
        assert_eq!(line.args, "1");

        let line = CommandLine::parse("AT+HFPAG").unwrap();
        assert_eq!((line.name, line.form), ("+HFPAG", CommandForm::Execute));
    }

    #[test]
    fn test_bare_at() {
        let line = CommandLine::parse("AT\r\n").unwrap();
        assert_eq!(line.name, "");
        assert_eq!(line.form, CommandForm::Execute);
    }

    #[test]
    fn test_setup_keeps_everything_after_first_equals() {
        let line = CommandLine::parse("AT+X=\"a=b\",1").unwrap();
        assert_eq!(line.name, "+X");
        assert_eq!(line.args, "\"a=b\",1");

        // Empty argument list is still the setup form
        let line = CommandLine::parse("AT+X=").unwrap();
        assert_eq!(line.form, CommandForm::Setup);
        assert_eq!(line.args, "");
    }

    #[test]
    fn test_missing_prefix() {
        assert_eq!(CommandLine::parse("+HFPAG"), Err(SyntaxError::MissingPrefix));
        assert_eq!(CommandLine::parse("at+HFPAG"), Err(SyntaxError::MissingPrefix));
        assert_eq!(CommandLine::parse(""), Err(SyntaxError::MissingPrefix));
    }
}
