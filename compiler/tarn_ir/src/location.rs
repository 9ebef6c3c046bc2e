//! Source locations.

use std::fmt;

/// Position of a node in its source text.
///
/// `line` is 1-based, `column` is a 0-based character offset within the line.
/// Synthesized nodes use [`Location::UNKNOWN`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    /// Location for nodes that were not parsed from text.
    pub const UNKNOWN: Location = Location { line: 0, column: 0 };

    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Location { line, column }
    }

    /// Whether this location points into real source text.
    #[inline]
    pub const fn is_known(self) -> bool {
        self.line != 0
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_is_not_known() {
        assert!(!Location::UNKNOWN.is_known());
        assert!(Location::new(1, 0).is_known());
    }

    #[test]
    fn display_and_debug() {
        let loc = Location::new(3, 7);
        assert_eq!(format!("{loc}"), "line 3, column 7");
        assert_eq!(format!("{loc:?}"), "3:7");
    }

    #[test]
    fn ordering_is_line_major() {
        assert!(Location::new(1, 9) < Location::new(2, 0));
        assert!(Location::new(2, 1) > Location::new(2, 0));
    }
}
