//! Tarn parser.
//!
//! Hand-written recursive descent over the token stream from `tarn_lexer`,
//! producing a [`tarn_ir::Module`]. The grammar is the statement and
//! expression grammar of the host language, so constructs the evaluator
//! refuses to run (`lambda`, `class`, `import`, ...) still parse into
//! their own node kinds and are rejected later with a clear message.
//!
//! Static checks done here:
//! - `break`/`continue` outside a loop and `return` outside a function
//! - assignment and deletion targets
//! - parameter list shape (duplicates, default ordering)
//!
//! # Usage
//!
//! ```text
//! let module = tarn_parse::parse("x = 1 + 2\nx * 3")?;
//! ```

mod cursor;
mod error;
mod grammar;

pub use error::ParseError;

use tarn_ir::Module;

/// Parse script text into a module.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse(source: &str) -> Result<Module, ParseError> {
    let tokens = tarn_lexer::lex(source)?;
    let module = grammar::Parser::new(tokens).parse_module();
    if let Err(err) = &module {
        tracing::debug!(line = err.line(), message = %err.message, "parse failed");
    }
    module
}
