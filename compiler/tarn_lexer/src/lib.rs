//! Tarn lexer.
//!
//! Turns script text into a flat [`Token`] stream with explicit layout
//! tokens (`Newline`, `Indent`, `Dedent`), ready for the recursive-descent
//! parser in `tarn_parse`.
//!
//! Literals are decoded here: integers become arbitrary-precision
//! `BigInt`s, string escapes are resolved, and unsupported literal forms
//! (complex numbers, f-strings) are rejected with a [`LexError`].

mod cursor;
mod error;
mod lexer;
mod token;

pub use error::LexError;
pub use token::{Keyword, Token, TokenKind};

/// Tokenize `source`.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    lexer::Lexer::new(source).run()
}

#[cfg(test)]
mod tests;
