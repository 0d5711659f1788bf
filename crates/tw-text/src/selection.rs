//! Selection state machine.
//!
//! Shared by the single-line text field (positions are byte offsets) and
//! the multi-line buffer (positions are [`Coordinate`](crate::Coordinate)s),
//! hence generic over the position type.
//!
//! ```text
//!            shift+nav                 toggle
//!   None ───────────────▶ Shift ───────────────▶ Mark
//!    ▲ ▲   nav w/o shift    │                     │
//!    │ └────────────────────┘                     │
//!    └──────────────────── toggle ────────────────┘
//! ```
//!
//! `Shift` is transient: the first navigation key without shift ends it.
//! `Mark` survives navigation and only ends through the toggle (or an edit
//! that consumes the selection). `start` is the anchor and `end` follows the
//! cursor, so `end < start` is normal for a backwards selection.

/// Selection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    None,
    /// Extending with shift held; ends on plain navigation.
    Shift,
    /// Persistent mark mode.
    Mark,
}

/// Anchor, moving end, and mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection<P> {
    mode: SelectionMode,
    start: P,
    end: P,
}

impl<P: Copy + Ord + Default> Selection<P> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> SelectionMode {
        self.mode
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.mode != SelectionMode::None
    }

    /// Anchor, meaningful only while active.
    #[inline]
    #[must_use]
    pub fn start(&self) -> P {
        self.start
    }

    #[inline]
    #[must_use]
    pub fn end(&self) -> P {
        self.end
    }

    /// Bookkeeping before a navigation key moves the cursor from `cursor`.
    ///
    /// Shift on an inactive selection anchors a new one; no shift ends a
    /// `Shift` selection. `Mark` is untouched either way. Returns `true`
    /// when a selection was dropped (the caller should redraw).
    pub fn before_navigation(&mut self, shift: bool, cursor: P) -> bool {
        match (self.mode, shift) {
            (SelectionMode::None, true) => {
                self.mode = SelectionMode::Shift;
                self.start = cursor;
                self.end = cursor;
                false
            }
            (SelectionMode::Shift, false) => {
                self.reset();
                true
            }
            _ => false,
        }
    }

    /// Follow the cursor after navigation or an edit.
    pub fn update_end(&mut self, cursor: P) {
        if self.is_active() {
            self.end = cursor;
        }
    }

    /// Toggle mark mode at `cursor`.
    ///
    /// From `None` the mark anchors at the cursor; from `Shift` the existing
    /// anchor is kept; from `Mark` the selection ends.
    pub fn toggle_mark(&mut self, cursor: P) {
        match self.mode {
            SelectionMode::None => {
                self.mode = SelectionMode::Mark;
                self.start = cursor;
                self.end = cursor;
            }
            SelectionMode::Shift => self.mode = SelectionMode::Mark,
            SelectionMode::Mark => self.reset(),
        }
    }

    /// Replace the selection outright (select-all, double click, find).
    pub fn set(&mut self, mode: SelectionMode, start: P, end: P) {
        self.mode = mode;
        self.start = start;
        self.end = end;
    }

    /// Back to `None`; positions revert to the sentinel default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// `(min, max)` while active.
    #[must_use]
    pub fn range(&self) -> Option<(P, P)> {
        if !self.is_active() {
            return None;
        }
        Some((self.start.min(self.end), self.start.max(self.end)))
    }

    /// Active and covering nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range().is_none_or(|(s, e)| s == e)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
