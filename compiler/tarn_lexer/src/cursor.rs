//! Character cursor over source text.
//!
//! Tracks the byte offset for slicing and the line/column pair for
//! [`Location`]s. The cursor is `Copy`, so a caller can snapshot it before a
//! speculative scan and restore it afterwards.

use tarn_ir::Location;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Cursor<'a> {
    src: &'a str,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Cursor {
            src,
            pos: 0,
            line: 1,
            column: 0,
        }
    }

    /// Current character, or `None` at end of input.
    #[inline]
    pub(crate) fn current(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    /// Character `n` positions past the current one.
    #[inline]
    pub(crate) fn peek(&self, n: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(n)
    }

    #[inline]
    pub(crate) fn check(&self, c: char) -> bool {
        self.current() == Some(c)
    }

    /// Advance past the current character and return it.
    pub(crate) fn advance(&mut self) -> Option<char> {
        let c = self.current()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Consume `c` if it is the current character.
    pub(crate) fn eat(&mut self, c: char) -> bool {
        if self.check(c) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume characters while `pred` holds.
    pub(crate) fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.current() {
            if !pred(c) {
                break;
            }
            self.advance();
        }
    }

    #[inline]
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) fn location(&self) -> Location {
        Location::new(self.line, self.column)
    }

    /// Source text from `start` up to the cursor.
    #[inline]
    pub(crate) fn slice_from(&self, start: usize) -> &'a str {
        &self.src[start..self.pos]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_lines_and_columns() {
        let mut c = Cursor::new("ab\ncd");
        c.advance();
        c.advance();
        assert_eq!(c.location(), Location::new(1, 2));
        c.advance();
        assert_eq!(c.location(), Location::new(2, 0));
        assert_eq!(c.current(), Some('c'));
        assert_eq!(c.peek(1), Some('d'));
    }

    #[test]
    fn eat_while_and_slice() {
        let mut c = Cursor::new("abc123 rest");
        let start = c.pos();
        c.eat_while(char::is_alphanumeric);
        assert_eq!(c.slice_from(start), "abc123");
        assert!(c.eat(' '));
        assert!(!c.eat('x'));
    }

    #[test]
    fn handles_multibyte_chars() {
        let mut c = Cursor::new("é!");
        assert_eq!(c.advance(), Some('é'));
        assert_eq!(c.current(), Some('!'));
        c.advance();
        assert_eq!(c.current(), None);
        assert_eq!(c.advance(), None);
    }
}
