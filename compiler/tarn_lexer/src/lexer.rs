//! The tokenizer proper.
//!
//! Layout rules:
//! - Inside `()`, `[]` and `{}` line breaks are ordinary whitespace.
//! - Blank lines and comment-only lines produce no tokens.
//! - A change of indentation at the start of a logical line produces
//!   `Indent`/`Dedent` tokens. Dedents must land on an enclosing level.
//! - A backslash directly before a line break joins the two lines.
//!
//! The token stream always ends with `Newline`, any pending `Dedent`s, and
//! a single `Eof`.

use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::Num;
use tarn_ir::{BinaryOp, Location};

use crate::cursor::Cursor;
use crate::token::{Keyword, Token, TokenKind};
use crate::LexError;

/// Columns a tab advances to (next multiple of this width).
const TAB_WIDTH: u32 = 8;

pub(crate) struct Lexer<'a> {
    cursor: Cursor<'a>,
    tokens: Vec<Token>,
    indents: Vec<u32>,
    depth: usize,
    at_line_start: bool,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Lexer {
            cursor: Cursor::new(src),
            tokens: Vec::new(),
            indents: vec![0],
            depth: 0,
            at_line_start: true,
        }
    }

    pub(crate) fn run(mut self) -> Result<Vec<Token>, LexError> {
        loop {
            if self.at_line_start && self.depth == 0 {
                self.indentation()?;
            }
            self.skip_trivia();
            let Some(c) = self.cursor.current() else {
                break;
            };
            let loc = self.cursor.location();
            if c == '\n' || c == '\r' {
                self.cursor.advance();
                if c == '\r' {
                    self.cursor.eat('\n');
                }
                self.end_line(loc);
                continue;
            }
            let kind = self.token(c, loc)?;
            self.tokens.push(Token::new(kind, loc));
        }

        let end = self.cursor.location();
        if self
            .tokens
            .last()
            .is_some_and(|t| !matches!(t.kind, TokenKind::Newline))
        {
            self.tokens.push(Token::new(TokenKind::Newline, end));
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.tokens.push(Token::new(TokenKind::Dedent, end));
        }
        self.tokens.push(Token::new(TokenKind::Eof, end));
        Ok(self.tokens)
    }

    fn end_line(&mut self, loc: Location) {
        if self.depth > 0 {
            return;
        }
        if self
            .tokens
            .last()
            .is_some_and(|t| !matches!(t.kind, TokenKind::Newline))
        {
            self.tokens.push(Token::new(TokenKind::Newline, loc));
        }
        self.at_line_start = true;
    }

    /// Measure the indentation of the next non-blank line and emit layout tokens.
    fn indentation(&mut self) -> Result<(), LexError> {
        loop {
            let mut width = 0u32;
            while let Some(c) = self.cursor.current() {
                match c {
                    ' ' => width += 1,
                    '\t' => width = (width / TAB_WIDTH + 1) * TAB_WIDTH,
                    '\x0c' => width = 0,
                    _ => break,
                }
                self.cursor.advance();
            }
            match self.cursor.current() {
                None => return Ok(()),
                Some('#') => {
                    self.cursor.eat_while(|c| c != '\n');
                    self.cursor.eat('\n');
                }
                Some('\n') => {
                    self.cursor.advance();
                }
                Some('\r') => {
                    self.cursor.advance();
                    self.cursor.eat('\n');
                }
                Some(_) => {
                    self.at_line_start = false;
                    return self.apply_indent(width);
                }
            }
        }
    }

    fn apply_indent(&mut self, width: u32) -> Result<(), LexError> {
        let loc = self.cursor.location();
        let current = self.indents.last().copied().unwrap_or(0);
        if width > current {
            self.indents.push(width);
            self.tokens.push(Token::new(TokenKind::Indent, loc));
        } else if width < current {
            while self.indents.last().is_some_and(|&level| width < level) {
                self.indents.pop();
                self.tokens.push(Token::new(TokenKind::Dedent, loc));
            }
            if self.indents.last().copied() != Some(width) {
                return Err(LexError::new(
                    "unindent does not match any outer indentation level",
                    loc,
                ));
            }
        }
        Ok(())
    }

    /// Skip spaces, comments, explicit line joins, and (inside brackets) line breaks.
    fn skip_trivia(&mut self) {
        while let Some(c) = self.cursor.current() {
            match c {
                ' ' | '\t' | '\x0c' => {
                    self.cursor.advance();
                }
                '#' => self.cursor.eat_while(|c| c != '\n' && c != '\r'),
                '\\' if matches!(self.cursor.peek(1), Some('\n' | '\r')) => {
                    self.cursor.advance();
                    if self.cursor.advance() == Some('\r') {
                        self.cursor.eat('\n');
                    }
                }
                '\n' | '\r' if self.depth > 0 => {
                    self.cursor.advance();
                }
                _ => break,
            }
        }
    }

    fn token(&mut self, c: char, loc: Location) -> Result<TokenKind, LexError> {
        if c.is_ascii_digit() || (c == '.' && self.cursor.peek(1).is_some_and(|d| d.is_ascii_digit()))
        {
            return self.number(loc);
        }
        if c == '\'' || c == '"' {
            return self.string(false, loc);
        }
        if is_ident_start(c) {
            return self.ident_or_string(loc);
        }
        self.cursor.advance();
        let kind = match c {
            '(' => self.open(TokenKind::LParen),
            '[' => self.open(TokenKind::LBracket),
            '{' => self.open(TokenKind::LBrace),
            ')' => self.close(TokenKind::RParen),
            ']' => self.close(TokenKind::RBracket),
            '}' => self.close(TokenKind::RBrace),
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '~' => TokenKind::Tilde,
            '`' => TokenKind::Backtick,
            '@' => TokenKind::At,
            '.' => {
                if self.cursor.check('.') && self.cursor.peek(1) == Some('.') {
                    self.cursor.advance();
                    self.cursor.advance();
                    TokenKind::Ellipsis
                } else {
                    TokenKind::Dot
                }
            }
            '+' => self.with_aug(BinaryOp::Add, TokenKind::Plus),
            '-' => {
                if self.cursor.eat('>') {
                    TokenKind::Arrow
                } else {
                    self.with_aug(BinaryOp::Sub, TokenKind::Minus)
                }
            }
            '*' => {
                if self.cursor.eat('*') {
                    self.with_aug(BinaryOp::Pow, TokenKind::DoubleStar)
                } else {
                    self.with_aug(BinaryOp::Mul, TokenKind::Star)
                }
            }
            '/' => {
                if self.cursor.eat('/') {
                    self.with_aug(BinaryOp::FloorDiv, TokenKind::DoubleSlash)
                } else {
                    self.with_aug(BinaryOp::Div, TokenKind::Slash)
                }
            }
            '%' => self.with_aug(BinaryOp::Mod, TokenKind::Percent),
            '&' => self.with_aug(BinaryOp::BitAnd, TokenKind::Amp),
            '|' => self.with_aug(BinaryOp::BitOr, TokenKind::Pipe),
            '^' => self.with_aug(BinaryOp::BitXor, TokenKind::Caret),
            '<' => {
                if self.cursor.eat('<') {
                    self.with_aug(BinaryOp::LShift, TokenKind::LShift)
                } else if self.cursor.eat('=') {
                    TokenKind::LtEq
                } else if self.cursor.eat('>') {
                    TokenKind::NotEq
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.cursor.eat('>') {
                    self.with_aug(BinaryOp::RShift, TokenKind::RShift)
                } else if self.cursor.eat('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '=' => {
                if self.cursor.eat('=') {
                    TokenKind::EqEq
                } else {
                    TokenKind::Assign
                }
            }
            '!' if self.cursor.eat('=') => TokenKind::NotEq,
            other => {
                return Err(LexError::new(
                    format!("invalid character `{}`", other.escape_debug()),
                    loc,
                ))
            }
        };
        Ok(kind)
    }

    fn open(&mut self, kind: TokenKind) -> TokenKind {
        self.depth += 1;
        kind
    }

    fn close(&mut self, kind: TokenKind) -> TokenKind {
        self.depth = self.depth.saturating_sub(1);
        kind
    }

    fn with_aug(&mut self, op: BinaryOp, plain: TokenKind) -> TokenKind {
        if self.cursor.eat('=') {
            TokenKind::AugAssign(op)
        } else {
            plain
        }
    }

    fn ident_or_string(&mut self, loc: Location) -> Result<TokenKind, LexError> {
        let start = self.cursor.pos();
        self.cursor.eat_while(is_ident_continue);
        let text = self.cursor.slice_from(start);

        if matches!(self.cursor.current(), Some('\'' | '"')) {
            if let Some(raw) = string_prefix(text) {
                return self.string(raw, loc);
            }
            if text.eq_ignore_ascii_case("f")
                || text.eq_ignore_ascii_case("rf")
                || text.eq_ignore_ascii_case("fr")
            {
                return Err(LexError::new("f-strings are not supported", loc));
            }
        }

        Ok(match Keyword::from_ident(text) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Name(Rc::from(text)),
        })
    }

    fn number(&mut self, loc: Location) -> Result<TokenKind, LexError> {
        let start = self.cursor.pos();
        if self.cursor.check('0') {
            let radix = match self.cursor.peek(1) {
                Some('x' | 'X') => Some(16),
                Some('o' | 'O') => Some(8),
                Some('b' | 'B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.cursor.advance();
                self.cursor.advance();
                let digits_start = self.cursor.pos();
                self.cursor.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
                let digits = self.cursor.slice_from(digits_start).replace('_', "");
                let value = BigInt::from_str_radix(&digits, radix)
                    .map_err(|_| LexError::new("invalid integer literal", loc))?;
                return Ok(TokenKind::Int(value));
            }
        }

        let mut is_float = false;
        self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
        if self.cursor.check('.') && self.cursor.peek(1) != Some('.') {
            is_float = true;
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
        }
        if matches!(self.cursor.current(), Some('e' | 'E')) {
            let exp_follows = match self.cursor.peek(1) {
                Some(d) if d.is_ascii_digit() => true,
                Some('+' | '-') => self.cursor.peek(2).is_some_and(|d| d.is_ascii_digit()),
                _ => false,
            };
            if exp_follows {
                is_float = true;
                self.cursor.advance();
                if !self.cursor.eat('+') {
                    self.cursor.eat('-');
                }
                self.cursor.eat_while(|c| c.is_ascii_digit());
            }
        }
        if matches!(self.cursor.current(), Some('j' | 'J')) {
            return Err(LexError::new("complex literals are not supported", loc));
        }
        if self.cursor.current().is_some_and(is_ident_continue) {
            return Err(LexError::new("invalid decimal literal", loc));
        }

        let text = self.cursor.slice_from(start).replace('_', "");
        if is_float {
            let value = text
                .parse::<f64>()
                .map_err(|_| LexError::new("invalid float literal", loc))?;
            return Ok(TokenKind::Float(value));
        }
        if text.len() > 1 && text.starts_with('0') && text.bytes().any(|b| b != b'0') {
            return Err(LexError::new(
                "leading zeros in decimal integer literals are not permitted",
                loc,
            ));
        }
        let value = BigInt::from_str_radix(&text, 10)
            .map_err(|_| LexError::new("invalid integer literal", loc))?;
        Ok(TokenKind::Int(value))
    }

    fn string(&mut self, raw: bool, loc: Location) -> Result<TokenKind, LexError> {
        let Some(quote) = self.cursor.advance() else {
            return Err(LexError::new("unterminated string literal", loc));
        };
        let triple = self.cursor.check(quote) && self.cursor.peek(1) == Some(quote);
        if triple {
            self.cursor.advance();
            self.cursor.advance();
        }
        let unterminated = || {
            if triple {
                LexError::new("unterminated triple-quoted string literal", loc)
            } else {
                LexError::new("unterminated string literal", loc)
            }
        };

        let mut out = String::new();
        loop {
            let Some(c) = self.cursor.advance() else {
                return Err(unterminated());
            };
            match c {
                c if c == quote => {
                    if !triple {
                        break;
                    }
                    if self.cursor.check(quote) && self.cursor.peek(1) == Some(quote) {
                        self.cursor.advance();
                        self.cursor.advance();
                        break;
                    }
                    out.push(c);
                }
                '\n' if !triple => return Err(unterminated()),
                '\\' if raw => {
                    let Some(next) = self.cursor.advance() else {
                        return Err(unterminated());
                    };
                    out.push('\\');
                    out.push(next);
                }
                '\\' => self.escape(&mut out, loc)?,
                c => out.push(c),
            }
        }
        Ok(TokenKind::Str(Rc::from(out)))
    }

    fn escape(&mut self, out: &mut String, loc: Location) -> Result<(), LexError> {
        let Some(c) = self.cursor.advance() else {
            return Err(LexError::new("unterminated string literal", loc));
        };
        match c {
            '\n' => {}
            '\r' => {
                self.cursor.eat('\n');
            }
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut value = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.cursor.current().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            self.cursor.advance();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            'x' => out.push(self.hex_escape(2, loc)?),
            'u' => out.push(self.hex_escape(4, loc)?),
            'U' => out.push(self.hex_escape(8, loc)?),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex_escape(&mut self, digits: usize, loc: Location) -> Result<char, LexError> {
        let mut value = 0u32;
        for _ in 0..digits {
            let Some(d) = self.cursor.current().and_then(|c| c.to_digit(16)) else {
                return Err(LexError::new("truncated escape sequence in string literal", loc));
            };
            value = value * 16 + d;
            self.cursor.advance();
        }
        char::from_u32(value)
            .ok_or_else(|| LexError::new("escape sequence is not a valid character", loc))
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Returns `Some(is_raw)` for accepted string prefixes (`r`, `b`, `u`, `rb`, `br`).
fn string_prefix(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "r" | "rb" | "br" => Some(true),
        "b" | "u" => Some(false),
        _ => None,
    }
}
