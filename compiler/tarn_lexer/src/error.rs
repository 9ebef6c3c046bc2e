//! Lexer errors.

use tarn_ir::Location;
use thiserror::Error;

/// A tokenization failure with the position it was detected at.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LexError {
    pub message: String,
    pub location: Location,
}

impl LexError {
    #[cold]
    pub fn new(message: impl Into<String>, location: Location) -> Self {
        LexError {
            message: message.into(),
            location,
        }
    }
}
