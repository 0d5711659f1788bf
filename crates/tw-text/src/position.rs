//! Text coordinates and spans.
//!
//! All coordinates are **0-indexed**. `line` indexes the buffer's line
//! vector; `pos` is a **byte offset** into that line which always sits on a
//! grapheme-cluster boundary. A combining sequence such as `e\u{301}` is
//! one step for the cursor, never split by an edit.
//!
//! Display layers convert to screen columns through
//! [`Line::calculate_screen_width`](crate::line::Line::calculate_screen_width);
//! that conversion never belongs here.

use std::fmt;

// ---------------------------------------------------------------------------
// Coordinate
// ---------------------------------------------------------------------------

/// A location in a text buffer: (line, byte offset).
///
/// Ordered lexicographically, line first: `(0, 9) < (1, 0)`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Coordinate {
    pub line: usize,
    pub pos: usize,
}

impl Coordinate {
    /// Line 0, offset 0.
    pub const ZERO: Self = Self { line: 0, pos: 0 };

    #[inline]
    #[must_use]
    pub const fn new(line: usize, pos: usize) -> Self {
        Self { line, pos }
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({}:{})", self.line, self.pos)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-indexed for humans.
        write!(f, "{}:{}", self.line + 1, self.pos + 1)
    }
}

// ---------------------------------------------------------------------------
// Span
// ---------------------------------------------------------------------------

/// A half-open range `[start, end)` with `start <= end`.
///
/// Selections may run backwards (the anchor after the cursor); build a span
/// from them with [`Span::ordered`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Coordinate,
    pub end: Coordinate,
}

impl Span {
    /// A span from two arbitrary coordinates, swapped if needed.
    #[inline]
    #[must_use]
    pub fn ordered(a: Coordinate, b: Coordinate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    #[inline]
    #[must_use]
    pub const fn is_single_line(self) -> bool {
        self.start.line == self.end.line
    }

    /// True when `c` falls within `[start, end)`.
    #[inline]
    #[must_use]
    pub fn contains(self, c: Coordinate) -> bool {
        c >= self.start && c < self.end
    }

    /// The byte range this span covers on `line`, given that line's length.
    /// `None` when the span does not touch the line.
    #[must_use]
    pub fn on_line(self, line: usize, line_len: usize) -> Option<(usize, usize)> {
        if line < self.start.line || line > self.end.line {
            return None;
        }
        let from = if line == self.start.line { self.start.pos } else { 0 };
        let to = if line == self.end.line { self.end.pos } else { line_len };
        Some((from.min(line_len), to.min(line_len)))
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({:?}..{:?})", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Coordinate ---------------------------------------------------------

    #[test]
    fn ordering_is_line_first() {
        assert!(Coordinate::new(0, 9) < Coordinate::new(1, 0));
        assert!(Coordinate::new(2, 1) < Coordinate::new(2, 3));
        assert_eq!(Coordinate::new(4, 4).max(Coordinate::new(4, 2)), Coordinate::new(4, 4));
    }

    #[test]
    fn display_is_one_indexed() {
        assert_eq!(Coordinate::new(0, 0).to_string(), "1:1");
        assert_eq!(format!("{:?}", Coordinate::new(3, 7)), "Coord(3:7)");
    }

    // -- Span ---------------------------------------------------------------

    #[test]
    fn ordered_swaps_backwards_input() {
        let a = Coordinate::new(3, 1);
        let b = Coordinate::new(1, 5);
        let span = Span::ordered(a, b);
        assert_eq!(span.start, b);
        assert_eq!(span.end, a);
        assert!(!span.is_single_line());
    }

    #[test]
    fn contains_is_half_open() {
        let span = Span::ordered(Coordinate::new(0, 2), Coordinate::new(0, 4));
        assert!(span.contains(Coordinate::new(0, 2)));
        assert!(!span.contains(Coordinate::new(0, 4)));
        assert!(Span::default().is_empty());
    }

    #[test]
    fn on_line_clips_per_line() {
        let span = Span::ordered(Coordinate::new(1, 3), Coordinate::new(3, 2));
        assert_eq!(span.on_line(0, 10), None);
        assert_eq!(span.on_line(1, 10), Some((3, 10)));
        assert_eq!(span.on_line(2, 6), Some((0, 6)));
        assert_eq!(span.on_line(3, 10), Some((0, 2)));
        assert_eq!(span.on_line(4, 10), None);
    }
}
