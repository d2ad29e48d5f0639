//! The dot: the current cursor position or selection in a line buffer.
//!
//! A dot is a pair of 0-indexed line numbers. When `start == end` it is an
//! insertion point sitting before line `start`; otherwise it selects lines
//! from `start` up to (but not including) `end`.

use std::fmt;

/// A cursor or selection range over buffer lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Dot {
    pub start: usize,
    pub end: usize,
}

impl Dot {
    /// Create a new dot.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The dot at the start of the buffer.
    pub fn zero() -> Self {
        Self { start: 0, end: 0 }
    }

    /// Select the single line at `index`.
    pub fn line(index: usize) -> Self {
        Self {
            start: index,
            end: index + 1,
        }
    }

    /// True when the dot is an insertion point rather than a range.
    pub fn is_point(&self) -> bool {
        self.start == self.end
    }

    /// Clamp the dot to a buffer of `len` lines.
    ///
    /// `end` is limited to `len` and `start` to `end`, so a range never
    /// starts past the last line and an insertion point may sit after it.
    pub fn clamp_to(&self, len: usize) -> Dot {
        let end = self.end.min(len);
        Dot::new(self.start.min(end), end)
    }
}

impl From<(usize, usize)> for Dot {
    fn from((start, end): (usize, usize)) -> Self {
        Dot::new(start, end)
    }
}

impl fmt::Display for Dot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.start, self.end)
    }
}
