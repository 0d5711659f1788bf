//! Multi-line text buffer: the document model behind multi-line widgets.
//!
//! A [`TextBuffer`] is a vector of [`Line`]s plus a cursor, a selection, and
//! an undo [`History`]. It never has zero lines: an empty document is one
//! empty line.
//!
//! # Design choices
//!
//! - **Edits are cursor-relative.** `insert_char`, `backspace_char` and
//!   friends act at the cursor and move it, the way a key press would. The
//!   widget decides which operation a key maps to.
//!
//! - **Selections are consumed by edits.** A replacing edit while a
//!   non-empty selection is active first deletes the selection; both halves
//!   undo as one step. An active but empty selection is simply dropped.
//!
//! - **Every mutation is recorded.** Undo is always available; the limit
//!   comes from [`TextBuffer::set_undo_limit`].
//!
//! - **Rewrap notifications.** Views that wrap lines subscribe to
//!   [`TextBuffer::rewrap`] and get told which lines were inserted, removed
//!   or changed, instead of rescanning the whole document.
//!
//! - **Line factory.** New lines come from a [`LineFactory`], so a buffer
//!   can hold lines with a custom word classifier.

use std::fmt;

use tracing::trace;
use tw_term::Signal;

use crate::find::{FindFlags, Finder};
use crate::history::{Editable, History, UndoKind, end_after_insert};
use crate::line::Line;
use crate::position::{Coordinate, Span};
use crate::selection::{Selection, SelectionMode};

// ---------------------------------------------------------------------------
// Line factory and rewrap events
// ---------------------------------------------------------------------------

/// Creates the lines a buffer stores.
pub trait LineFactory {
    fn new_line(&self) -> Line;
}

/// Plain [`Line`]s with the default classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLineFactory;

impl LineFactory for DefaultLineFactory {
    fn new_line(&self) -> Line {
        Line::new()
    }
}

/// What changed, for views that cache wrapped layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewrapEvent {
    /// `count` new lines now start at index `line`.
    InsertLines { line: usize, count: usize },
    /// `count` lines starting at index `line` were removed.
    DeleteLines { line: usize, count: usize },
    /// The content of `line` changed.
    RewrapLine(usize),
    /// Everything changed.
    RewrapAll,
}

// ---------------------------------------------------------------------------
// TextBuffer
// ---------------------------------------------------------------------------

/// A multi-line document with cursor, selection and undo.
pub struct TextBuffer {
    lines: Vec<Line>,
    cursor: Coordinate,
    selection: Selection<Coordinate>,
    history: History,
    factory: Box<dyn LineFactory>,
    /// Notified after every structural change.
    pub rewrap: Signal<RewrapEvent>,
    /// Screen column remembered across vertical movement.
    pub last_set_pos: usize,
}

impl TextBuffer {
    /// An empty buffer (one empty line).
    #[must_use]
    pub fn new() -> Self {
        Self::with_factory(Box::new(DefaultLineFactory))
    }

    #[must_use]
    pub fn with_factory(factory: Box<dyn LineFactory>) -> Self {
        Self {
            lines: vec![factory.new_line()],
            cursor: Coordinate::ZERO,
            selection: Selection::new(),
            history: History::new(),
            factory,
            rewrap: Signal::new(),
            last_set_pos: 0,
        }
    }

    /// A buffer holding `text`, unmodified and with empty history.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut buf = Self::new();
        buf.set_text(text);
        buf
    }

    /// Replace the whole content without recording undo. Cursor, selection
    /// and history reset.
    pub fn set_text(&mut self, text: &str) {
        self.lines = vec![self.factory.new_line()];
        self.cursor = Coordinate::ZERO;
        self.selection.reset();
        self.append_text(text);
        self.history.clear();
        self.rewrap.emit(&RewrapEvent::RewrapAll);
    }

    pub fn set_undo_limit(&mut self, limit: usize) {
        self.history.set_limit(limit);
    }

    // -- Access -------------------------------------------------------------

    /// Number of lines, always at least 1.
    #[must_use]
    pub fn size(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    #[must_use]
    pub fn line_text(&self, idx: usize) -> &str {
        self.lines.get(idx).map_or("", Line::as_str)
    }

    /// Byte length of line `idx`.
    #[must_use]
    pub fn line_len(&self, idx: usize) -> usize {
        self.lines.get(idx).map_or(0, Line::len)
    }

    /// The whole document, lines joined with `\n`.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(line.as_str());
        }
        out
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> Coordinate {
        self.cursor
    }

    /// The last valid coordinate.
    #[must_use]
    pub fn end(&self) -> Coordinate {
        let last = self.lines.len() - 1;
        Coordinate::new(last, self.lines[last].len())
    }

    /// `c` moved onto the nearest valid cursor position.
    #[must_use]
    pub fn clamp(&self, c: Coordinate) -> Coordinate {
        let line = c.line.min(self.lines.len() - 1);
        let text = &self.lines[line];
        let mut pos = c.pos.min(text.len());
        while !text.is_boundary(pos) {
            pos -= 1;
        }
        Coordinate::new(line, pos)
    }

    /// Move the cursor, clamped to the document.
    pub fn goto_pos(&mut self, line: usize, pos: usize) {
        self.cursor = self.clamp(Coordinate::new(line, pos));
    }

    // -- Character edits ----------------------------------------------------

    /// Insert `ch` at the cursor. `'\n'` breaks the line.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if ch == '\n' {
            return self.break_line();
        }
        let opened = self.begin_replace();
        let at = self.cursor;
        let done = self.lines[at.line].insert_char(at.pos, ch);
        if done {
            self.cursor.pos += ch.len_utf8();
            self.history
                .record_insert(UndoKind::InsertChar, at, ch.encode_utf8(&mut [0; 4]), at, self.cursor);
            self.rewrap.emit(&RewrapEvent::RewrapLine(at.line));
        }
        self.end_replace(opened);
        done || opened
    }

    /// Replace the cluster under the cursor with `ch` (append at the end).
    pub fn overwrite_char(&mut self, ch: char) -> bool {
        let opened = self.begin_replace();
        let at = self.cursor;
        let old = self.lines[at.line].overwrite_char(at.pos, ch);
        if let Some(old) = &old {
            self.cursor.pos += ch.len_utf8();
            self.history.record_replace(
                UndoKind::Overwrite,
                at,
                old,
                ch.encode_utf8(&mut [0; 4]),
                at,
                self.cursor,
            );
            self.rewrap.emit(&RewrapEvent::RewrapLine(at.line));
        }
        self.end_replace(opened);
        old.is_some() || opened
    }

    /// Delete the cluster under the cursor; at the end of a line, join the
    /// next line. A non-empty selection is deleted instead.
    pub fn delete_char(&mut self) -> bool {
        if self.take_selection() {
            return true;
        }
        let at = self.cursor;
        if at.pos >= self.lines[at.line].len() {
            return self.merge(false);
        }
        let Some(removed) = self.lines[at.line].delete_char(at.pos) else {
            return false;
        };
        self.history
            .record_delete(UndoKind::DeleteChar, at, &removed, at, at);
        self.rewrap.emit(&RewrapEvent::RewrapLine(at.line));
        true
    }

    /// Delete the cluster before the cursor; at the start of a line, join
    /// it to the previous line. A non-empty selection is deleted instead.
    pub fn backspace_char(&mut self) -> bool {
        if self.take_selection() {
            return true;
        }
        let before = self.cursor;
        if before.pos == 0 {
            return self.merge(true);
        }
        let Some((pos, removed)) = self.lines[before.line].backspace_char(before.pos) else {
            return false;
        };
        self.cursor.pos = pos;
        self.history
            .record_delete(UndoKind::Backspace, self.cursor, &removed, before, self.cursor);
        self.rewrap.emit(&RewrapEvent::RewrapLine(before.line));
        true
    }

    /// Delete from the start of the previous word to the cursor.
    pub fn backspace_word(&mut self) -> bool {
        if self.take_selection() {
            return true;
        }
        let before = self.cursor;
        if before.pos == 0 {
            return self.merge(true);
        }
        let Some((pos, removed)) = self.lines[before.line].backspace_word(before.pos) else {
            return false;
        };
        self.cursor.pos = pos;
        self.history
            .record_delete(UndoKind::DeleteBlock, self.cursor, &removed, before, self.cursor);
        self.rewrap.emit(&RewrapEvent::RewrapLine(before.line));
        true
    }

    /// Join the cursor line with its neighbour: the previous line when
    /// `backspace`, the next otherwise. The cursor lands on the junction.
    pub fn merge(&mut self, backspace: bool) -> bool {
        let before = self.cursor;
        let upper = if backspace {
            match before.line.checked_sub(1) {
                Some(l) => l,
                None => return false,
            }
        } else {
            before.line
        };
        if upper + 1 >= self.lines.len() {
            return false;
        }
        let junction = Coordinate::new(upper, self.lines[upper].len());
        self.delete_text_internal(junction, Coordinate::new(upper + 1, 0));
        self.cursor = junction;
        let kind = if backspace {
            UndoKind::Backspace
        } else {
            UndoKind::DeleteChar
        };
        self.history.record_delete(kind, junction, "\n", before, junction);
        true
    }

    /// Split the cursor line at the cursor.
    pub fn break_line(&mut self) -> bool {
        let opened = self.begin_replace();
        let at = self.cursor;
        let end = self.insert_text_internal(at, "\n");
        self.cursor = end;
        self.history
            .record_insert(UndoKind::InsertBlock, at, "\n", at, end);
        self.end_replace(opened);
        true
    }

    // -- Block edits --------------------------------------------------------

    /// Insert possibly multi-line `text` at the cursor.
    pub fn insert_block(&mut self, text: &str) -> bool {
        let opened = self.begin_replace();
        if text.is_empty() {
            self.end_replace(opened);
            return opened;
        }
        let at = self.cursor;
        let end = self.insert_text_internal(at, text);
        self.cursor = end;
        self.history
            .record_insert(UndoKind::InsertBlock, at, text, at, end);
        self.end_replace(opened);
        true
    }

    /// Append `text` at the end of the document without recording undo or
    /// moving the cursor. Used to load content.
    pub fn append_text(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let end = self.end();
        self.insert_text_internal(end, text);
        true
    }

    /// The text of `[start, end)`.
    #[must_use]
    pub fn convert_block(&self, start: Coordinate, end: Coordinate) -> String {
        let span = Span::ordered(self.clamp(start), self.clamp(end));
        let mut out = String::new();
        for l in span.start.line..=span.end.line {
            if l > span.start.line {
                out.push('\n');
            }
            let line = &self.lines[l];
            if let Some((from, to)) = span.on_line(l, line.len()) {
                out.push_str(line.slice(from, to));
            }
        }
        out
    }

    // -- Selection ----------------------------------------------------------

    #[must_use]
    pub const fn selection(&self) -> &Selection<Coordinate> {
        &self.selection
    }

    #[must_use]
    pub fn selection_mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    /// The normalised selection while one is active.
    #[must_use]
    pub fn selection_range(&self) -> Option<Span> {
        self.selection.range().map(|(s, e)| Span { start: s, end: e })
    }

    #[must_use]
    pub fn selection_empty(&self) -> bool {
        self.selection.is_empty()
    }

    /// Switch selection mode. Entering a mode from `None` anchors at the
    /// cursor; `None` drops the selection.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        match (self.selection.mode(), mode) {
            (_, SelectionMode::None) => self.selection.reset(),
            (SelectionMode::None, m) => self.selection.set(m, self.cursor, self.cursor),
            (_, m) => {
                let (start, end) = (self.selection.start(), self.selection.end());
                self.selection.set(m, start, end);
            }
        }
    }

    /// Selection bookkeeping before a navigation key. Returns `true` when a
    /// selection was dropped.
    pub fn before_navigation(&mut self, shift: bool) -> bool {
        self.selection.before_navigation(shift, self.cursor)
    }

    /// Make the selection follow the cursor.
    pub fn set_selection_end(&mut self) {
        self.selection.update_end(self.cursor);
    }

    pub fn toggle_mark(&mut self) {
        self.selection.toggle_mark(self.cursor);
    }

    pub fn select_all(&mut self) {
        let end = self.end();
        self.selection.set(SelectionMode::Shift, Coordinate::ZERO, end);
        self.cursor = end;
    }

    /// Text of the non-empty selection.
    #[must_use]
    pub fn selection_text(&self) -> Option<String> {
        match self.selection.range() {
            Some((s, e)) if s != e => Some(self.convert_block(s, e)),
            _ => None,
        }
    }

    /// Delete the selected text, leaving the cursor at its start. Always
    /// drops the selection.
    pub fn delete_selection(&mut self) {
        let range = self.selection.range();
        self.selection.reset();
        let Some((start, end)) = range else {
            return;
        };
        if start == end {
            return;
        }
        let before = self.cursor;
        let text = self.convert_block(start, end);
        self.delete_text_internal(start, end);
        self.cursor = start;
        self.history
            .record_delete(UndoKind::DeleteBlock, start, &text, before, start);
    }

    /// Replace the selection (or insert at the cursor) with `text`, as one
    /// undo step.
    pub fn replace_selection(&mut self, text: &str) -> bool {
        self.history.start_block(UndoKind::ReplaceBlock, self.cursor);
        self.delete_selection();
        self.insert_block(text);
        self.history.end_block(self.cursor);
        true
    }

    /// Delete a non-empty selection ahead of a replacing edit. Returns
    /// whether an undo block was opened.
    fn begin_replace(&mut self) -> bool {
        match self.selection.range() {
            Some((s, e)) if s != e => {
                self.history.start_block(UndoKind::ReplaceBlock, self.cursor);
                self.delete_selection();
                true
            }
            _ => {
                self.selection.reset();
                false
            }
        }
    }

    fn end_replace(&mut self, opened: bool) {
        if opened {
            self.history.end_block(self.cursor);
        }
    }

    /// For deleting edits: consume a non-empty selection.
    fn take_selection(&mut self) -> bool {
        if self.selection_text().is_some() {
            self.delete_selection();
            true
        } else {
            self.selection.reset();
            false
        }
    }

    // -- Indentation --------------------------------------------------------

    /// Lines touched by the selection, or the cursor line. A selection
    /// ending at column 0 does not include that last line.
    fn selected_lines(&self) -> (usize, usize) {
        match self.selection.range() {
            Some((s, e)) if s != e => {
                let last = if e.pos == 0 && e.line > s.line {
                    e.line - 1
                } else {
                    e.line
                };
                (s.line, last)
            }
            _ => (self.cursor.line, self.cursor.line),
        }
    }

    /// Shift coordinates on `line` after `delta` bytes were inserted
    /// (positive) or removed (negative) at its start.
    fn shift_line_coords(&mut self, line: usize, delta: isize) {
        let shift = |c: Coordinate| {
            if c.line != line || (delta > 0 && c.pos == 0) {
                c
            } else {
                Coordinate::new(c.line, c.pos.saturating_add_signed(delta))
            }
        };
        self.cursor = shift(self.cursor);
        let (mode, start, end) = (
            self.selection.mode(),
            self.selection.start(),
            self.selection.end(),
        );
        if mode != SelectionMode::None {
            self.selection.set(mode, shift(start), shift(end));
        }
    }

    /// Indent every non-empty selected line by one level.
    pub fn indent_selection(&mut self, tabsize: usize, tab_spaces: bool) -> bool {
        let indent = if tab_spaces {
            " ".repeat(tabsize.max(1))
        } else {
            "\t".to_string()
        };
        let (first, last) = self.selected_lines();
        self.history.start_block(UndoKind::Indent, self.cursor);
        let mut changed = false;
        for l in first..=last {
            if self.lines[l].is_empty() {
                continue;
            }
            self.lines[l].insert_str(0, &indent);
            let before = self.cursor;
            self.shift_line_coords(l, isize::try_from(indent.len()).unwrap_or(isize::MAX));
            let at = Coordinate::new(l, 0);
            self.history
                .record_insert(UndoKind::Indent, at, &indent, before, self.cursor);
            self.rewrap.emit(&RewrapEvent::RewrapLine(l));
            changed = true;
        }
        self.history.end_block(self.cursor);
        changed
    }

    /// Remove one indentation level from every selected line.
    pub fn unindent_selection(&mut self, tabsize: usize) -> bool {
        let (first, last) = self.selected_lines();
        self.unindent_lines(first, last, tabsize)
    }

    /// Remove one indentation level from the cursor line.
    pub fn unindent_line(&mut self, tabsize: usize) -> bool {
        let line = self.cursor.line;
        self.unindent_lines(line, line, tabsize)
    }

    fn unindent_lines(&mut self, first: usize, last: usize, tabsize: usize) -> bool {
        self.history.start_block(UndoKind::Unindent, self.cursor);
        let mut changed = false;
        for l in first..=last {
            let count = leading_indent(self.lines[l].as_str(), tabsize);
            if count == 0 {
                continue;
            }
            let removed = self.lines[l].cut(0, count);
            let before = self.cursor;
            self.shift_line_coords(l, -isize::try_from(count).unwrap_or(isize::MAX));
            let at = Coordinate::new(l, 0);
            self.history
                .record_delete(UndoKind::Unindent, at, removed.as_str(), before, self.cursor);
            self.rewrap.emit(&RewrapEvent::RewrapLine(l));
            changed = true;
        }
        self.history.end_block(self.cursor);
        changed
    }

    // -- Navigation ---------------------------------------------------------

    /// Move by `adjust` clusters within the cursor line.
    pub fn adjust_position(&mut self, adjust: isize) {
        let line = &self.lines[self.cursor.line];
        self.cursor.pos = line.adjust_position(self.cursor.pos, adjust);
    }

    /// Start of the next word, continuing onto following lines.
    pub fn goto_next_word(&mut self) {
        let c = self.cursor;
        match self.lines[c.line].next_word(c.pos) {
            Some(pos) => self.cursor.pos = pos,
            None if c.line + 1 < self.lines.len() => {
                let next = c.line + 1;
                let text = self.lines[next].as_str();
                let pos = if text.starts_with(char::is_whitespace) {
                    self.lines[next].next_word(0).unwrap_or(text.len())
                } else {
                    0
                };
                self.cursor = Coordinate::new(next, pos);
            }
            None => self.cursor.pos = self.lines[c.line].len(),
        }
    }

    /// Start of the previous word, continuing onto preceding lines.
    pub fn goto_previous_word(&mut self) {
        let c = self.cursor;
        let line = &self.lines[c.line];
        let only_blanks_before = line.as_str()[..c.pos].trim().is_empty();
        if (c.pos == 0 || only_blanks_before) && c.line > 0 {
            let prev = &self.lines[c.line - 1];
            let pos = prev.previous_word(prev.len()).unwrap_or(0);
            self.cursor = Coordinate::new(c.line - 1, pos);
            return;
        }
        self.cursor.pos = line.previous_word(c.pos).unwrap_or(0);
    }

    /// End of the run under the cursor; from the end of a line, the start
    /// of the next.
    pub fn goto_next_word_boundary(&mut self) {
        let c = self.cursor;
        match self.lines[c.line].next_word_boundary(c.pos) {
            Some(pos) => self.cursor.pos = pos,
            None if c.line + 1 < self.lines.len() => self.cursor = Coordinate::new(c.line + 1, 0),
            None => {}
        }
    }

    /// Start of the run before the cursor; from the start of a line, the
    /// end of the previous.
    pub fn goto_previous_word_boundary(&mut self) {
        let c = self.cursor;
        match self.lines[c.line].previous_word_boundary(c.pos) {
            Some(pos) => self.cursor.pos = pos,
            None if c.line > 0 => {
                self.cursor = Coordinate::new(c.line - 1, self.lines[c.line - 1].len());
            }
            None => {}
        }
    }

    #[must_use]
    pub fn width_at_cursor(&self) -> usize {
        self.lines[self.cursor.line].width_at(self.cursor.pos)
    }

    /// Screen column of `at`.
    #[must_use]
    pub fn calculate_screen_pos(&self, at: Coordinate, tabsize: usize) -> usize {
        self.lines
            .get(at.line)
            .map_or(0, |l| l.calculate_screen_width(0, at.pos, tabsize))
    }

    /// Byte offset on `line` for screen column `col`.
    #[must_use]
    pub fn calculate_line_pos(&self, line: usize, col: usize, tabsize: usize) -> usize {
        self.lines
            .get(line)
            .map_or(0, |l| l.calculate_line_pos(col, tabsize))
    }

    // -- Search -------------------------------------------------------------

    /// Find the next match from the cursor (or before the selection when
    /// searching backward) and select it.
    pub fn find(&mut self, finder: &dyn Finder) -> Option<Span> {
        let flags = finder.flags();
        let wrap = flags.contains(FindFlags::WRAP);
        let found = if flags.contains(FindFlags::BACKWARD) {
            let from = self
                .selection
                .range()
                .map_or(self.cursor, |(s, _)| s.min(self.cursor));
            self.search_backward(finder, from, wrap)
        } else {
            self.search_forward(finder, self.cursor, wrap)
        };
        if let Some(span) = found {
            self.selection.set(SelectionMode::Shift, span.start, span.end);
            self.cursor = span.end;
            trace!(target: "tw.text.buffer", ?span, "find");
        }
        found
    }

    /// The first match inside `[start, end)`, without touching the cursor.
    #[must_use]
    pub fn find_limited(&self, finder: &dyn Finder, start: Coordinate, end: Coordinate) -> Option<Span> {
        let span = Span::ordered(self.clamp(start), self.clamp(end));
        for l in span.start.line..=span.end.line {
            let line = self.lines[l].as_str();
            let Some((from, to)) = span.on_line(l, line.len()) else {
                continue;
            };
            if let Some((s, e)) = finder.find_in(line, from, to, false) {
                return Some(Span {
                    start: Coordinate::new(l, s),
                    end: Coordinate::new(l, e),
                });
            }
        }
        None
    }

    /// Replace the selected match with the finder's replacement and select
    /// the inserted text.
    pub fn replace(&mut self, finder: &dyn Finder) -> bool {
        let Some(matched) = self.selection_text() else {
            return false;
        };
        let Some((start, _)) = self.selection.range() else {
            return false;
        };
        let replacement = finder.replacement(&matched);
        self.replace_selection(&replacement);
        self.selection.set(SelectionMode::Shift, start, self.cursor);
        true
    }

    fn search_forward(&self, finder: &dyn Finder, from: Coordinate, wrap: bool) -> Option<Span> {
        let n = self.lines.len();
        let laps = if wrap { n } else { n - from.line - 1 };
        for off in 0..=laps {
            let l = (from.line + off) % n;
            let line = self.lines[l].as_str();
            let (s, e) = match off {
                0 => (from.pos, line.len()),
                _ if off == n => (0, from.pos),
                _ => (0, line.len()),
            };
            if let Some((a, b)) = finder.find_in(line, s, e, false) {
                return Some(Span {
                    start: Coordinate::new(l, a),
                    end: Coordinate::new(l, b),
                });
            }
        }
        None
    }

    fn search_backward(&self, finder: &dyn Finder, from: Coordinate, wrap: bool) -> Option<Span> {
        let n = self.lines.len();
        let laps = if wrap { n } else { from.line };
        for off in 0..=laps {
            let l = (from.line + n - off % n) % n;
            let line = self.lines[l].as_str();
            let (s, e) = match off {
                0 => (0, from.pos),
                _ if off == n => (from.pos, line.len()),
                _ => (0, line.len()),
            };
            if let Some((a, b)) = finder.find_in(line, s, e, true) {
                return Some(Span {
                    start: Coordinate::new(l, a),
                    end: Coordinate::new(l, b),
                });
            }
        }
        None
    }

    // -- Undo ---------------------------------------------------------------

    /// Undo the last step. Returns `false` when there was nothing to undo.
    pub fn apply_undo(&mut self) -> bool {
        let mut history = std::mem::take(&mut self.history);
        let cursor = history.undo(self);
        self.history = history;
        self.restore_cursor(cursor)
    }

    /// Redo the last undone step. Returns `false` when there was nothing to
    /// redo.
    pub fn apply_redo(&mut self) -> bool {
        let mut history = std::mem::take(&mut self.history);
        let cursor = history.redo(self);
        self.history = history;
        self.restore_cursor(cursor)
    }

    fn restore_cursor(&mut self, cursor: Option<Coordinate>) -> bool {
        let Some(cursor) = cursor else {
            return false;
        };
        self.selection.reset();
        self.cursor = self.clamp(cursor);
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Start an explicit undo group (e.g. a paste of many keystrokes).
    pub fn start_undo_block(&mut self) {
        self.history.start_block(UndoKind::InsertBlock, self.cursor);
    }

    pub fn end_undo_block(&mut self) {
        self.history.end_block(self.cursor);
    }

    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.history.is_modified()
    }

    /// Record the current state as the save point.
    pub fn set_unmodified(&mut self) {
        self.history.set_mark();
    }

    // -- Internals ----------------------------------------------------------

    /// Insert `text` at `at` without recording. Returns the end coordinate.
    fn insert_text_internal(&mut self, at: Coordinate, text: &str) -> Coordinate {
        let at = self.clamp(at);
        let mut segments = text.split('\n');
        let first = segments.next().unwrap_or("");
        let rest: Vec<&str> = segments.collect();

        if rest.is_empty() {
            self.lines[at.line].insert_str(at.pos, first);
            self.rewrap.emit(&RewrapEvent::RewrapLine(at.line));
            return Coordinate::new(at.line, at.pos + first.len());
        }

        let tail = self.lines[at.line]
            .break_at(at.pos)
            .unwrap_or_else(|| self.factory.new_line());
        self.lines[at.line].insert_str(at.pos, first);

        let mut new_lines = Vec::with_capacity(rest.len());
        for segment in &rest {
            let mut line = self.factory.new_line();
            line.set_text(segment);
            new_lines.push(line);
        }
        let end = Coordinate::new(at.line + rest.len(), new_lines.last().map_or(0, Line::len));
        if let Some(last) = new_lines.last_mut() {
            last.merge(tail);
        }
        let count = new_lines.len();
        self.lines.splice(at.line + 1..at.line + 1, new_lines);

        trace!(target: "tw.text.buffer", line = at.line, count, "insert lines");
        self.rewrap.emit(&RewrapEvent::RewrapLine(at.line));
        self.rewrap.emit(&RewrapEvent::InsertLines {
            line: at.line + 1,
            count,
        });
        debug_assert_eq!(end, end_after_insert(at, text));
        end
    }

    /// Remove `[start, end)` without recording.
    fn delete_text_internal(&mut self, start: Coordinate, end: Coordinate) {
        let span = Span::ordered(self.clamp(start), self.clamp(end));
        let (s, e) = (span.start, span.end);
        if s.line == e.line {
            self.lines[s.line].cut(s.pos, e.pos);
            self.rewrap.emit(&RewrapEvent::RewrapLine(s.line));
            return;
        }
        let tail = self.lines[e.line].break_at(e.pos);
        let head_len = self.lines[s.line].len();
        self.lines[s.line].cut(s.pos, head_len);
        self.lines.drain(s.line + 1..=e.line);
        if let Some(tail) = tail {
            self.lines[s.line].merge(tail);
        }
        let count = e.line - s.line;
        trace!(target: "tw.text.buffer", line = s.line + 1, count, "delete lines");
        self.rewrap.emit(&RewrapEvent::DeleteLines {
            line: s.line + 1,
            count,
        });
        self.rewrap.emit(&RewrapEvent::RewrapLine(s.line));
    }
}

impl Editable for TextBuffer {
    fn insert_text(&mut self, at: Coordinate, text: &str) {
        self.insert_text_internal(at, text);
    }

    fn delete_text(&mut self, start: Coordinate, end: Coordinate) {
        self.delete_text_internal(start, end);
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBuffer")
            .field("lines", &self.lines.len())
            .field("cursor", &self.cursor)
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

/// Bytes of leading indentation making up one level: a single tab, or up
/// to `tabsize` spaces.
fn leading_indent(text: &str, tabsize: usize) -> usize {
    if text.starts_with('\t') {
        return 1;
    }
    text.bytes()
        .take(tabsize.max(1))
        .take_while(|&b| b == b' ')
        .count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
