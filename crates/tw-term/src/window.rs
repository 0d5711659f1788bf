// SPDX-License-Identifier: MIT
//
// Window: the drawing surface widgets paint into.
//
// Widgets never talk to a terminal. Each one owns a rectangular `Window`,
// positions a paint cursor with `set_paint`, writes styled text with
// `addstr`/`addch`, and blanks the remainder with `clrtoeol`/`clrtobot`.
// A backend later composes the shown windows onto the screen.
//
// The `Surface` trait is that contract. `Window` is the in-memory
// implementation: a row-major cell grid plus an absolute screen origin,
// which is also what mouse hit-testing works against.
//
//   screen
//   ┌──────────────────────────────┐
//   │      (x,y)                   │
//   │        ┌─────────┐           │
//   │        │ Window  │ h         │
//   │        └─────────┘           │
//   │            w                 │
//   └──────────────────────────────┘
//
// Painting past the right edge is clipped. A wide character that would
// straddle the edge is dropped and the remaining column blanked.

use unicode_width::UnicodeWidthChar;

use crate::cell::{Cell, Style};

// ─── Rect ───────────────────────────────────────────────────────────────────

/// A screen rectangle in absolute cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// One past the rightmost column.
    #[inline]
    #[must_use]
    pub const fn right(self) -> u16 {
        self.x.saturating_add(self.w)
    }

    /// One past the bottom row.
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> u16 {
        self.y.saturating_add(self.h)
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Whether the absolute point `(px, py)` lies inside.
    #[inline]
    #[must_use]
    pub const fn contains(self, px: u16, py: u16) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// A `w`×`h` rectangle centred inside `self` (clamped to fit).
    #[must_use]
    pub const fn centered(self, w: u16, h: u16) -> Self {
        let w = if w > self.w { self.w } else { w };
        let h = if h > self.h { self.h } else { h };
        Self {
            x: self.x + (self.w - w) / 2,
            y: self.y + (self.h - h) / 2,
            w,
            h,
        }
    }
}

// ─── Surface ────────────────────────────────────────────────────────────────

/// The drawing primitive widgets paint through.
///
/// Coordinates passed to `set_paint` are relative to the surface.
pub trait Surface {
    fn width(&self) -> u16;
    fn height(&self) -> u16;

    /// Change the surface size. Returns `false` if the surface cannot take
    /// that size.
    fn resize(&mut self, width: u16, height: u16) -> bool;

    /// Move the paint cursor.
    fn set_paint(&mut self, row: u16, col: u16);

    /// Write `text` at the paint cursor, advancing it.
    fn addstr(&mut self, text: &str, style: Style);

    /// Write one character at the paint cursor, advancing it.
    fn addch(&mut self, ch: char, style: Style);

    /// Blank from the paint cursor to the end of its row.
    fn clrtoeol(&mut self);

    /// Blank from the paint cursor to the end of the surface.
    fn clrtobot(&mut self);
}

// ─── Window ─────────────────────────────────────────────────────────────────

/// An in-memory cell grid at an absolute screen position.
#[derive(Clone)]
pub struct Window {
    rect: Rect,
    cells: Vec<Cell>,
    paint_row: u16,
    paint_col: u16,
    shown: bool,
    /// Where the terminal cursor should sit when this window has focus.
    cursor: Option<(u16, u16)>,
}

impl Window {
    /// A hidden window covering `rect`, filled with blanks.
    #[must_use]
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            cells: vec![Cell::BLANK; usize::from(rect.w) * usize::from(rect.h)],
            paint_row: 0,
            paint_col: 0,
            shown: false,
            cursor: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Move the window's origin to an absolute screen position.
    pub const fn move_to(&mut self, x: u16, y: u16) {
        self.rect.x = x;
        self.rect.y = y;
    }

    /// Position this window directly below `anchor`, left-aligned.
    pub const fn anchor_below(&mut self, anchor: Rect) {
        self.move_to(anchor.x, anchor.bottom());
    }

    pub const fn show(&mut self) {
        self.shown = true;
    }

    pub const fn hide(&mut self) {
        self.shown = false;
    }

    #[inline]
    #[must_use]
    pub const fn is_shown(&self) -> bool {
        self.shown
    }

    /// Whether the absolute point `(x, y)` is inside this window.
    #[inline]
    #[must_use]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        self.rect.contains(x, y)
    }

    /// Convert an absolute screen point to window-relative `(col, row)`.
    #[must_use]
    pub const fn relative(&self, x: u16, y: u16) -> Option<(u16, u16)> {
        if self.contains(x, y) {
            Some((x - self.rect.x, y - self.rect.y))
        } else {
            None
        }
    }

    pub const fn set_cursor(&mut self, row: u16, col: u16) {
        self.cursor = Some((row, col));
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    /// The cell at window-relative `(col, row)`.
    #[must_use]
    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        self.index(col, row).map(|i| &self.cells[i])
    }

    /// Row `row` as text, continuation cells skipped and trailing blanks
    /// kept. Handy for assertions.
    #[must_use]
    pub fn row_text(&self, row: u16) -> String {
        if row >= self.rect.h {
            return String::new();
        }
        let start = usize::from(row) * usize::from(self.rect.w);
        self.cells[start..start + usize::from(self.rect.w)]
            .iter()
            .filter(|c| !c.is_continuation())
            .map(|c| c.ch)
            .collect()
    }

    fn index(&self, col: u16, row: u16) -> Option<usize> {
        if col < self.rect.w && row < self.rect.h {
            Some(usize::from(row) * usize::from(self.rect.w) + usize::from(col))
        } else {
            None
        }
    }

    fn blank_range(&mut self, from: usize, to: usize) {
        for cell in &mut self.cells[from..to] {
            *cell = Cell::BLANK;
        }
    }
}

impl Surface for Window {
    fn width(&self) -> u16 {
        self.rect.w
    }

    fn height(&self) -> u16 {
        self.rect.h
    }

    fn resize(&mut self, width: u16, height: u16) -> bool {
        let mut cells = vec![Cell::BLANK; usize::from(width) * usize::from(height)];
        let keep_w = usize::from(width.min(self.rect.w));
        for row in 0..usize::from(height.min(self.rect.h)) {
            let src = row * usize::from(self.rect.w);
            let dst = row * usize::from(width);
            cells[dst..dst + keep_w].copy_from_slice(&self.cells[src..src + keep_w]);
        }
        self.cells = cells;
        self.rect.w = width;
        self.rect.h = height;
        true
    }

    fn set_paint(&mut self, row: u16, col: u16) {
        self.paint_row = row;
        self.paint_col = col;
    }

    fn addstr(&mut self, text: &str, style: Style) {
        for ch in text.chars() {
            self.addch(ch, style);
        }
    }

    fn addch(&mut self, ch: char, style: Style) {
        let width = char_width(ch);
        if width == 0 {
            return;
        }
        let Some(idx) = self.index(self.paint_col, self.paint_row) else {
            return;
        };
        if width == 2 {
            match self.index(self.paint_col + 1, self.paint_row) {
                Some(next) => {
                    self.cells[idx] = Cell::new(ch, style);
                    self.cells[next] = Cell::new('\0', style);
                }
                None => self.cells[idx] = Cell::new(' ', style),
            }
        } else {
            self.cells[idx] = Cell::new(ch, style);
        }
        self.paint_col = self.paint_col.saturating_add(u16::try_from(width).unwrap_or(1));
    }

    fn clrtoeol(&mut self) {
        if let Some(idx) = self.index(self.paint_col, self.paint_row) {
            let end = (usize::from(self.paint_row) + 1) * usize::from(self.rect.w);
            self.blank_range(idx, end);
        }
    }

    fn clrtobot(&mut self) {
        if let Some(idx) = self.index(self.paint_col, self.paint_row) {
            let end = self.cells.len();
            self.blank_range(idx, end);
        }
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Window({}x{} at {},{})",
            self.rect.w, self.rect.h, self.rect.x, self.rect.y
        )
    }
}

// ─── Width Helpers ──────────────────────────────────────────────────────────

/// Display width of a character in terminal columns.
///
/// Returns 0 for control and zero-width characters, 2 for wide characters.
#[must_use]
pub fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

/// Display width of a string in terminal columns.
#[must_use]
pub fn string_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cell::Attr;

    // ── Rect ────────────────────────────────────────────────────────────

    #[test]
    fn rect_contains_edges() {
        let r = Rect::new(10, 5, 4, 2);
        assert!(r.contains(10, 5));
        assert!(r.contains(13, 6));
        assert!(!r.contains(14, 5));
        assert!(!r.contains(10, 7));
        assert!(!r.contains(9, 5));
    }

    #[test]
    fn rect_centered() {
        let outer = Rect::new(0, 0, 80, 24);
        assert_eq!(outer.centered(20, 10), Rect::new(30, 7, 20, 10));
        assert_eq!(outer.centered(100, 30), outer);
    }

    // ── Painting ────────────────────────────────────────────────────────

    #[test]
    fn addstr_and_row_text() {
        let mut win = Window::new(Rect::new(0, 0, 6, 2));
        win.set_paint(0, 1);
        win.addstr("hi", Style::PLAIN);
        assert_eq!(win.row_text(0), " hi   ");
        assert_eq!(win.row_text(1), "      ");
    }

    #[test]
    fn addstr_clips_at_right_edge() {
        let mut win = Window::new(Rect::new(0, 0, 3, 1));
        win.set_paint(0, 0);
        win.addstr("hello", Style::PLAIN);
        assert_eq!(win.row_text(0), "hel");
    }

    #[test]
    fn wide_char_uses_two_cells() {
        let mut win = Window::new(Rect::new(0, 0, 4, 1));
        win.set_paint(0, 0);
        win.addstr("中a", Style::PLAIN);
        assert_eq!(win.row_text(0), "中a ");
        assert!(win.cell(1, 0).is_some_and(Cell::is_continuation));
    }

    #[test]
    fn wide_char_at_edge_is_blanked() {
        let mut win = Window::new(Rect::new(0, 0, 2, 1));
        win.set_paint(0, 1);
        win.addch('中', Style::PLAIN);
        assert_eq!(win.row_text(0), "  ");
    }

    #[test]
    fn clrtoeol_and_clrtobot() {
        let mut win = Window::new(Rect::new(0, 0, 3, 2));
        for row in 0..2 {
            win.set_paint(row, 0);
            win.addstr("xyz", Style::attr(Attr::BOLD));
        }
        win.set_paint(0, 1);
        win.clrtoeol();
        assert_eq!(win.row_text(0), "x  ");
        assert_eq!(win.row_text(1), "xyz");
        win.set_paint(1, 2);
        win.clrtobot();
        assert_eq!(win.row_text(1), "xy ");
        assert_eq!(win.cell(1, 0).map(|c| c.style.attr), Some(Attr::empty()));
    }

    #[test]
    fn resize_keeps_overlap() {
        let mut win = Window::new(Rect::new(0, 0, 3, 1));
        win.set_paint(0, 0);
        win.addstr("abc", Style::PLAIN);
        assert!(win.resize(5, 2));
        assert_eq!(win.row_text(0), "abc  ");
        assert_eq!(win.height(), 2);
    }

    // ── Positioning ─────────────────────────────────────────────────────

    #[test]
    fn relative_coordinates() {
        let mut win = Window::new(Rect::new(0, 0, 5, 1));
        win.move_to(10, 3);
        assert_eq!(win.relative(12, 3), Some((2, 0)));
        assert_eq!(win.relative(9, 3), None);
    }

    #[test]
    fn anchor_below_places_under() {
        let mut win = Window::new(Rect::new(0, 0, 5, 3));
        win.anchor_below(Rect::new(4, 2, 10, 1));
        assert_eq!(win.rect(), Rect::new(4, 3, 5, 3));
    }

    // ── Width ───────────────────────────────────────────────────────────

    #[test]
    fn widths() {
        assert_eq!(char_width('a'), 1);
        assert_eq!(char_width('中'), 2);
        assert_eq!(char_width('\t'), 0);
        assert_eq!(string_width("a中b"), 4);
    }
}
