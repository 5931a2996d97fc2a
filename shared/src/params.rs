//! Setup-form parameter list
//!
//! Parameters are comma separated. A string may be wrapped in double quotes,
//! in which case commas inside the quotes do not split and the quotes are
//! stripped. Digits must be unquoted decimal integers.

use crate::address::{AddressError, BdAddr};
use thiserror::Error;

/// Errors extracting a typed parameter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("parameter {index} is missing")]
    Missing { index: usize },

    #[error("parameter {index} is not a digit: {text:?}")]
    NotADigit { index: usize, text: String },

    #[error("parameter {index} is not a string: {text:?}")]
    NotAString { index: usize, text: String },

    #[error("parameter {index} is not an address: {text:?} ({source})")]
    BadAddress {
        index: usize,
        text: String,
        #[source]
        source: AddressError,
    },
}

impl ParseError {
    /// Index of the offending parameter
    pub fn index(&self) -> usize {
        match self {
            ParseError::Missing { index }
            | ParseError::NotADigit { index, .. }
            | ParseError::NotAString { index, .. }
            | ParseError::BadAddress { index, .. } => *index,
        }
    }
}

/// One raw parameter token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token<'a> {
    text: &'a str,
    quoted: bool,
}

/// Parsed view over the argument text of a setup-form line
#[derive(Debug, Clone, Default)]
pub struct ParamList<'a> {
    tokens: Vec<Token<'a>>,
}

impl<'a> ParamList<'a> {
    /// Split raw argument text into tokens
    pub fn new(args: &'a str) -> Self {
        if args.is_empty() {
            return Self::default();
        }

        let mut tokens = Vec::new();
        let mut start = 0;
        let mut in_quotes = false;

        for (i, c) in args.char_indices() {
            match c {
                '"' => in_quotes = !in_quotes,
                ',' if !in_quotes => {
                    tokens.push(Token::from_raw(&args[start..i]));
                    start = i + 1;
                }
                _ => {}
            }
        }
        tokens.push(Token::from_raw(&args[start..]));

        Self { tokens }
    }

    /// Number of parameters on the line
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn token(&self, index: usize) -> Result<Token<'a>, ParseError> {
        self.tokens
            .get(index)
            .copied()
            .ok_or(ParseError::Missing { index })
    }

    /// Parameter `index` as a signed integer; range checks are left to the caller
    ///
    /// Only an optional leading `-` is accepted as a sign.
    pub fn digit(&self, index: usize) -> Result<i32, ParseError> {
        let token = self.token(index)?;
        if token.quoted || token.text.is_empty() || token.text.starts_with('+') {
            return Err(ParseError::NotADigit {
                index,
                text: token.text.to_string(),
            });
        }
        token.text.parse::<i32>().map_err(|_| ParseError::NotADigit {
            index,
            text: token.text.to_string(),
        })
    }

    /// Parameter `index` as text, quotes removed
    pub fn string(&self, index: usize) -> Result<&'a str, ParseError> {
        let token = self.token(index)?;
        if token.text.is_empty() && !token.quoted {
            return Err(ParseError::NotAString {
                index,
                text: String::new(),
            });
        }
        Ok(token.text)
    }

    /// Parameter `index` as a hardware address
    pub fn address(&self, index: usize) -> Result<BdAddr, ParseError> {
        let text = self.string(index)?;
        text.parse::<BdAddr>().map_err(|source| ParseError::BadAddress {
            index,
            text: text.to_string(),
            source,
        })
    }
}

impl<'a> Token<'a> {
    fn from_raw(raw: &'a str) -> Self {
        match raw
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            Some(inner) if raw.len() >= 2 => Self {
                text: inner,
                quoted: true,
            },
            _ => Self {
                text: raw,
                quoted: false,
            },
        }
    }
}
