//! Token cursor for navigating the token stream.
//!
//! Provides lookahead and consumption helpers. The token list produced by
//! the lexer always ends with `Eof`, and the cursor never moves past it.

use std::rc::Rc;

use tarn_ir::Location;
use tarn_lexer::{Keyword, Token, TokenKind};

use crate::ParseError;

pub(crate) struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl Cursor {
    pub(crate) fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
            let loc = tokens.last().map_or(Location::new(1, 0), |t| t.loc);
            tokens.push(Token::new(TokenKind::Eof, loc));
        }
        Cursor { tokens, pos: 0 }
    }

    #[inline]
    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    #[inline]
    pub(crate) fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    #[inline]
    pub(crate) fn current_loc(&self) -> Location {
        self.current().loc
    }

    /// Kind of the token `n` positions ahead (clamped to `Eof`).
    pub(crate) fn peek_kind(&self, n: usize) -> &TokenKind {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    #[inline]
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    #[inline]
    pub(crate) fn check_keyword(&self, kw: Keyword) -> bool {
        matches!(self.current_kind(), TokenKind::Keyword(k) if *k == kw)
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.check(&TokenKind::Eof)
    }

    /// Move past the current token and return it.
    pub(crate) fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_keyword(&mut self, kw: Keyword) -> bool {
        if self.check_keyword(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or fail with "expected `kind`".
    pub(crate) fn expect(&mut self, kind: &TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&kind.describe()))
        }
    }

    pub(crate) fn expect_keyword(&mut self, kw: Keyword) -> Result<Token, ParseError> {
        if self.check_keyword(kw) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("`{}`", kw.as_str())))
        }
    }

    /// Consume an identifier.
    pub(crate) fn expect_name(&mut self) -> Result<Rc<str>, ParseError> {
        if let TokenKind::Name(name) = self.current_kind() {
            let name = Rc::clone(name);
            self.advance();
            Ok(name)
        } else {
            Err(self.unexpected("a name"))
        }
    }

    /// Build an "invalid syntax" error at the current token.
    #[cold]
    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        let tok = self.current();
        let found = tok.kind.describe();
        match &tok.kind {
            TokenKind::Keyword(_) => ParseError::new(
                format!("invalid syntax: expected {expected}, found reserved word {found}"),
                tok.loc,
            ),
            _ => ParseError::new(
                format!("invalid syntax: expected {expected}, found {found}"),
                tok.loc,
            ),
        }
    }
}
