//! Parse error type.

use tarn_ir::Location;
use tarn_lexer::LexError;
use thiserror::Error;

/// A syntax error: the message plus where it was detected.
///
/// Lexer failures are folded into the same type so callers see one
/// syntax-failure shape regardless of which stage rejected the text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub location: Location,
}

impl ParseError {
    #[cold]
    pub fn new(message: impl Into<String>, location: Location) -> Self {
        ParseError {
            message: message.into(),
            location,
        }
    }

    /// 1-based line of the error.
    pub fn line(&self) -> u32 {
        self.location.line
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
        }
    }
}
