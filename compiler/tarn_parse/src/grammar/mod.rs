//! Grammar productions.
//!
//! - `stmt`: statements, blocks and definitions
//! - `expr`: expressions, from `test` down to atoms

mod expr;
mod stmt;

use tarn_ir::{Module, Stmt};
use tarn_lexer::{Token, TokenKind};

use crate::cursor::Cursor;
use crate::ParseError;

/// Recursive-descent parser state.
pub(crate) struct Parser {
    cursor: Cursor,
    /// Number of enclosing loops in the current function body.
    loop_depth: u32,
    /// Number of enclosing function definitions.
    func_depth: u32,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            loop_depth: 0,
            func_depth: 0,
        }
    }

    /// `file: (NEWLINE | stmt)* EOF`
    pub(crate) fn parse_module(&mut self) -> Result<Module, ParseError> {
        let mut body = Vec::new();
        loop {
            while self.cursor.eat(&TokenKind::Newline) {}
            if self.cursor.is_at_end() {
                break;
            }
            if self.cursor.check(&TokenKind::Indent) {
                return Err(ParseError::new(
                    "unexpected indent",
                    self.cursor.current_loc(),
                ));
            }
            self.statement(&mut body)?;
        }
        Ok(Module::new(body))
    }

    /// Statements until the end of an indented block.
    fn block_statements(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut body = Vec::new();
        while !self.cursor.check(&TokenKind::Dedent) && !self.cursor.is_at_end() {
            if self.cursor.eat(&TokenKind::Newline) {
                continue;
            }
            self.statement(&mut body)?;
        }
        self.cursor.eat(&TokenKind::Dedent);
        Ok(body)
    }
}
