//! A single line of editable text.
//!
//! [`Line`] owns its text exclusively and is the unit the text field edits
//! directly and the multi-line buffer keeps a vector of. Every position is
//! a byte offset on a grapheme-cluster boundary; operations given a
//! position that is not a boundary (or past the end) do nothing and report
//! that through their `bool` / `Option` result.
//!
//! # Screen width
//!
//! | Cluster | Columns |
//! |---------|---------|
//! | printable | its Unicode width, at least 1 |
//! | tab, `tabsize > 0` | up to the next multiple of `tabsize` |
//! | tab, `tabsize == 0` | 2, drawn as `^I` |
//! | other control | 2, drawn as `^X` |
//!
//! Tab stops are absolute: they are measured from the start of the line,
//! not from `from`, so `calculate_screen_width(from, to, ts)` is the column
//! difference between the two offsets.

use tw_term::{Style, Surface};
use unicode_segmentation::{GraphemeCursor, UnicodeSegmentation};
use unicode_width::UnicodeWidthStr;

use crate::word::{self, Classifier};

// ---------------------------------------------------------------------------
// Line
// ---------------------------------------------------------------------------

/// Text plus the classifier that defines its word boundaries.
#[derive(Clone)]
pub struct Line {
    text: String,
    classify: Classifier,
}

impl Line {
    /// An empty line with the default classifier.
    #[must_use]
    pub fn new() -> Self {
        Self::with_classifier(word::classify)
    }

    /// An empty line with a custom word classifier.
    #[must_use]
    pub const fn with_classifier(classify: Classifier) -> Self {
        Self {
            text: String::new(),
            classify,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[inline]
    #[must_use]
    pub const fn classifier(&self) -> Classifier {
        self.classify
    }

    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// A new empty line sharing this line's classifier.
    fn sibling(&self, text: &str) -> Self {
        Self {
            text: text.to_string(),
            classify: self.classify,
        }
    }

    // -- Positions ----------------------------------------------------------

    /// Whether `pos` is a valid cursor position.
    #[must_use]
    pub fn is_boundary(&self, pos: usize) -> bool {
        if pos > self.text.len() || !self.text.is_char_boundary(pos) {
            return false;
        }
        GraphemeCursor::new(pos, self.text.len(), true)
            .is_boundary(&self.text, 0)
            .unwrap_or(false)
    }

    /// The offset one cluster after `pos` (or `len()` at the end).
    #[must_use]
    pub fn next_pos(&self, pos: usize) -> usize {
        self.text[pos..]
            .graphemes(true)
            .next()
            .map_or(pos, |g| pos + g.len())
    }

    /// The offset one cluster before `pos` (or 0 at the start).
    #[must_use]
    pub fn prev_pos(&self, pos: usize) -> usize {
        self.text[..pos]
            .graphemes(true)
            .next_back()
            .map_or(0, |g| pos - g.len())
    }

    /// Move `pos` by `adjust` clusters, clamped to the line.
    #[must_use]
    pub fn adjust_position(&self, mut pos: usize, adjust: isize) -> usize {
        pos = pos.min(self.text.len());
        if adjust >= 0 {
            for _ in 0..adjust {
                pos = self.next_pos(pos);
            }
        } else {
            for _ in 0..adjust.unsigned_abs() {
                pos = self.prev_pos(pos);
            }
        }
        pos
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `ch` before the cluster at `pos`.
    pub fn insert_char(&mut self, pos: usize, ch: char) -> bool {
        if !self.is_boundary(pos) {
            return false;
        }
        self.text.insert(pos, ch);
        true
    }

    pub fn append_char(&mut self, ch: char) {
        self.text.push(ch);
    }

    /// Replace the cluster at `pos` with `ch`, or append at the end.
    /// Returns the replaced text (empty when appending).
    pub fn overwrite_char(&mut self, pos: usize, ch: char) -> Option<String> {
        if !self.is_boundary(pos) {
            return None;
        }
        let end = self.next_pos(pos);
        let old = self.text[pos..end].to_string();
        self.text.replace_range(pos..end, ch.encode_utf8(&mut [0; 4]));
        Some(old)
    }

    /// Remove the cluster at `pos`. Returns the removed text.
    pub fn delete_char(&mut self, pos: usize) -> Option<String> {
        if pos >= self.text.len() || !self.is_boundary(pos) {
            return None;
        }
        let end = self.next_pos(pos);
        Some(self.text.drain(pos..end).collect())
    }

    /// Remove the cluster before `pos`. Returns the new position and the
    /// removed text.
    pub fn backspace_char(&mut self, pos: usize) -> Option<(usize, String)> {
        if pos == 0 || !self.is_boundary(pos) {
            return None;
        }
        let start = self.prev_pos(pos);
        Some((start, self.text.drain(start..pos).collect()))
    }

    /// Remove from the start of the previous word up to `pos`. Returns the
    /// new position and the removed text.
    pub fn backspace_word(&mut self, pos: usize) -> Option<(usize, String)> {
        if !self.is_boundary(pos) {
            return None;
        }
        let start = self.previous_word(pos)?;
        Some((start, self.text.drain(start..pos).collect()))
    }

    /// Extract `[start, end)` as a detached line. Out-of-order or invalid
    /// offsets yield an empty line and leave `self` untouched.
    pub fn cut(&mut self, start: usize, end: usize) -> Self {
        if start >= end || !self.is_boundary(start) || !self.is_boundary(end) {
            return self.sibling("");
        }
        let taken: String = self.text.drain(start..end).collect();
        self.sibling(&taken)
    }

    /// The text of `[start, end)` without removing it.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> &str {
        let end = end.min(self.text.len());
        self.text.get(start.min(end)..end).unwrap_or("")
    }

    /// Insert the text of `other` at `at`.
    pub fn insert(&mut self, other: &Self, at: usize) -> bool {
        self.insert_str(at, other.as_str())
    }

    pub fn insert_str(&mut self, at: usize, text: &str) -> bool {
        if !self.is_boundary(at) {
            return false;
        }
        self.text.insert_str(at, text);
        true
    }

    /// Append `other` to this line.
    pub fn merge(&mut self, other: Self) {
        self.text.push_str(&other.text);
    }

    /// Split at `pos`: `self` keeps the head, the tail is returned.
    pub fn break_at(&mut self, pos: usize) -> Option<Self> {
        if !self.is_boundary(pos) {
            return None;
        }
        let tail = self.text.split_off(pos);
        Some(self.sibling(&tail))
    }

    // -- Words --------------------------------------------------------------

    #[must_use]
    pub fn next_word(&self, pos: usize) -> Option<usize> {
        word::next_word(&self.text, pos, self.classify)
    }

    #[must_use]
    pub fn previous_word(&self, pos: usize) -> Option<usize> {
        word::previous_word(&self.text, pos, self.classify)
    }

    #[must_use]
    pub fn next_word_boundary(&self, pos: usize) -> Option<usize> {
        word::next_word_boundary(&self.text, pos, self.classify)
    }

    #[must_use]
    pub fn previous_word_boundary(&self, pos: usize) -> Option<usize> {
        word::previous_word_boundary(&self.text, pos, self.classify)
    }

    #[must_use]
    pub fn word_at(&self, pos: usize) -> (usize, usize) {
        word::word_at(&self.text, pos, self.classify)
    }

    // -- Screen width -------------------------------------------------------

    /// Width of the cluster at `pos`; 1 at the end of the line (the cursor
    /// cell).
    #[must_use]
    pub fn width_at(&self, pos: usize) -> usize {
        self.text
            .get(pos..)
            .and_then(|rest| rest.graphemes(true).next())
            .map_or(1, |g| cluster_width(g, 0, 0))
    }

    /// Columns spanned by `[from, to)`, with absolute tab stops.
    #[must_use]
    pub fn calculate_screen_width(&self, from: usize, to: usize, tabsize: usize) -> usize {
        let mut col = 0;
        let mut width = 0;
        for (i, g) in self.text.grapheme_indices(true) {
            if i >= to {
                break;
            }
            let w = cluster_width(g, col, tabsize);
            if i >= from {
                width += w;
            }
            col += w;
        }
        width
    }

    /// The offset of the cluster covering screen column `col`, or `len()`
    /// when `col` lies past the end.
    #[must_use]
    pub fn calculate_line_pos(&self, col: usize, tabsize: usize) -> usize {
        let mut acc = 0;
        for (i, g) in self.text.grapheme_indices(true) {
            let w = cluster_width(g, acc, tabsize);
            if col < acc + w {
                return i;
            }
            acc += w;
        }
        self.text.len()
    }

    // -- Painting -----------------------------------------------------------

    /// Paint the visible slice of this line at the surface's paint cursor.
    ///
    /// Clusters cut by either viewport edge are drawn as spaces so the
    /// painted width is exact. The caller clears the rest of the row.
    pub fn paint(&self, surface: &mut impl Surface, info: &PaintInfo) {
        let right = info.leftcol + info.width;
        let mut col = 0;
        for (i, g) in self.text.grapheme_indices(true) {
            if col >= right {
                break;
            }
            let w = cluster_width(g, col, info.tabsize);
            if col + w <= info.leftcol {
                col += w;
                continue;
            }
            let style = match info.selection {
                Some((s, e)) if i >= s && i < e => info.normal.combine(info.selected),
                _ => info.normal,
            };
            let visible = col.max(info.leftcol)..(col + w).min(right);
            let clipped = col < info.leftcol || col + w > right;
            match g.chars().next() {
                _ if clipped => {
                    for _ in visible {
                        surface.addch(' ', style);
                    }
                }
                Some('\t') if info.tabsize > 0 => {
                    for _ in 0..w {
                        surface.addch(' ', style);
                    }
                }
                Some(ch) if ch.is_control() => {
                    surface.addch('^', style);
                    surface.addch(control_glyph(ch), style);
                }
                _ if UnicodeWidthStr::width(g) == 0 => surface.addch(' ', style),
                _ => surface.addstr(g, style),
            }
            col += w;
        }
    }
}

/// Parameters for [`Line::paint`].
#[derive(Debug, Clone, Copy)]
pub struct PaintInfo {
    /// First visible screen column.
    pub leftcol: usize,
    /// Number of columns to paint.
    pub width: usize,
    pub tabsize: usize,
    /// Byte range drawn with the selection style.
    pub selection: Option<(usize, usize)>,
    pub normal: Style,
    /// Layered over `normal` for selected clusters.
    pub selected: Style,
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        let mut line = Self::new();
        line.text.push_str(text);
        line
    }
}

impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Line {}

impl std::fmt::Debug for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line({:?})", self.text)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn cluster_width(g: &str, col: usize, tabsize: usize) -> usize {
    match g.chars().next() {
        Some('\t') if tabsize > 0 => tabsize - col % tabsize,
        Some(ch) if ch.is_control() => 2,
        _ => UnicodeWidthStr::width(g).max(1),
    }
}

fn control_glyph(ch: char) -> char {
    match u8::try_from(u32::from(ch)) {
        Ok(code) if code < 0x20 => char::from(code + b'@'),
        _ => '?',
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
