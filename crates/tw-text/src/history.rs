//! Undo/redo history with coalescing.
//!
//! Every mutation is recorded as an entry of reversible edits tagged
//! with an [`UndoKind`]. An entry is the atomic unit of undo/redo.
//!
//! # Coalescing
//!
//! Typing "hello" should undo in one step, not five. A new record merges
//! into the most recent entry when the kinds match and the edit continues
//! where the previous one left off:
//!
//! | Kind | Adjacent when |
//! |------|---------------|
//! | `InsertChar` | inserted right after the previous insert |
//! | `DeleteChar` | deleted at the same offset (forward delete) |
//! | `Backspace` | deleted right before the previous deletion |
//! | `Overwrite` | overwrote right after the previous overwrite |
//!
//! Merging is blocked by [`History::seal`], by block boundaries, by
//! undo/redo themselves, and by [`History::set_mark`].
//!
//! # Blocks
//!
//! ```text
//! history.start_block(UndoKind::Indent, cursor);
//! // any number of record_* calls
//! history.end_block(cursor);
//! ```
//!
//! Everything recorded between the markers becomes one entry. Blocks nest;
//! only the outermost pair delimits the entry. Empty blocks are dropped.
//!
//! # Branching
//!
//! There is none. Any new edit after an undo discards the redo stack.

use tracing::debug;

use crate::position::Coordinate;

// ---------------------------------------------------------------------------
// Edit
// ---------------------------------------------------------------------------

/// Classification of an undo entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoKind {
    InsertChar,
    DeleteChar,
    Backspace,
    Overwrite,
    InsertBlock,
    DeleteBlock,
    /// Delete then insert, as one step (paste over a selection, replace).
    ReplaceBlock,
    Indent,
    Unindent,
}

/// A single reversible edit. Text may span lines (`\n`).
#[derive(Debug, Clone, PartialEq, Eq)]
enum Edit {
    /// Undo = delete it. Redo = insert it.
    Insert { at: Coordinate, text: String },
    /// Undo = insert it back. Redo = delete it again.
    Delete { at: Coordinate, text: String },
}

impl Edit {
    fn text(&self) -> &str {
        match self {
            Self::Insert { text, .. } | Self::Delete { text, .. } => text,
        }
    }
}

/// The document an entry is applied to.
pub trait Editable {
    /// Insert `text` (which may contain `\n`) at `at`.
    fn insert_text(&mut self, at: Coordinate, text: &str);
    /// Remove `[start, end)`.
    fn delete_text(&mut self, start: Coordinate, end: Coordinate);
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Entry {
    kind: UndoKind,
    edits: Vec<Edit>,
    cursor_before: Coordinate,
    cursor_after: Coordinate,
}

impl Entry {
    fn undo(&self, doc: &mut impl Editable) {
        for edit in self.edits.iter().rev() {
            match edit {
                Edit::Insert { at, text } => doc.delete_text(*at, end_after_insert(*at, text)),
                Edit::Delete { at, text } => doc.insert_text(*at, text),
            }
        }
    }

    fn redo(&self, doc: &mut impl Editable) {
        for edit in &self.edits {
            match edit {
                Edit::Insert { at, text } => doc.insert_text(*at, text),
                Edit::Delete { at, text } => doc.delete_text(*at, end_after_insert(*at, text)),
            }
        }
    }

    /// Try to fold `new` into this entry.
    fn coalesce(&mut self, kind: UndoKind, new: &[Edit]) -> bool {
        if kind != self.kind {
            return false;
        }
        match (kind, self.edits.as_mut_slice(), new) {
            (
                UndoKind::InsertChar,
                [Edit::Insert { at, text }],
                [Edit::Insert { at: b, text: u }],
            ) if b.line == at.line && b.pos == at.pos + text.len() && !u.contains('\n') => {
                text.push_str(u);
                true
            }
            (
                UndoKind::DeleteChar,
                [Edit::Delete { at, text }],
                [Edit::Delete { at: b, text: u }],
            ) if *b == *at && !u.contains('\n') => {
                text.push_str(u);
                true
            }
            (
                UndoKind::Backspace,
                [Edit::Delete { at, text }],
                [Edit::Delete { at: b, text: u }],
            ) if b.line == at.line && b.pos + u.len() == at.pos && !u.contains('\n') => {
                text.insert_str(0, u);
                *at = *b;
                true
            }
            (
                UndoKind::Overwrite,
                [Edit::Delete { at, text: old }, Edit::Insert { text: written, .. }],
                [Edit::Delete { at: b, text: old2 }, Edit::Insert { text: written2, .. }],
            ) if b.line == at.line && b.pos == at.pos + written.len() => {
                old.push_str(old2);
                written.push_str(written2);
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Undo and redo stacks plus block and coalescing state.
#[derive(Debug)]
pub struct History {
    undo_stack: Vec<Entry>,
    redo_stack: Vec<Entry>,
    /// Entry being assembled between `start_block` and `end_block`.
    block: Option<Entry>,
    depth: usize,
    /// When set, the next record starts a new entry.
    sealed: bool,
    /// Maximum entries kept; 0 is unlimited.
    limit: usize,
    /// `undo_stack.len()` at the last save point. `None` when that state
    /// can no longer be reached.
    mark: Option<usize>,
}

impl History {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_limit(0)
    }

    #[must_use]
    pub const fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            block: None,
            depth: 0,
            sealed: true,
            limit,
            mark: Some(0),
        }
    }

    pub const fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
    }

    // -- Recording ----------------------------------------------------------

    /// Record that `text` was inserted at `at`.
    pub fn record_insert(
        &mut self,
        kind: UndoKind,
        at: Coordinate,
        text: &str,
        cursor_before: Coordinate,
        cursor_after: Coordinate,
    ) {
        let edit = Edit::Insert {
            at,
            text: text.to_string(),
        };
        self.record(kind, vec![edit], cursor_before, cursor_after);
    }

    /// Record that `text` was deleted starting at `at`. Capture the text
    /// before deleting it.
    pub fn record_delete(
        &mut self,
        kind: UndoKind,
        at: Coordinate,
        text: &str,
        cursor_before: Coordinate,
        cursor_after: Coordinate,
    ) {
        let edit = Edit::Delete {
            at,
            text: text.to_string(),
        };
        self.record(kind, vec![edit], cursor_before, cursor_after);
    }

    /// Record that `old` at `at` was replaced by `new`.
    pub fn record_replace(
        &mut self,
        kind: UndoKind,
        at: Coordinate,
        old: &str,
        new: &str,
        cursor_before: Coordinate,
        cursor_after: Coordinate,
    ) {
        let edits = vec![
            Edit::Delete {
                at,
                text: old.to_string(),
            },
            Edit::Insert {
                at,
                text: new.to_string(),
            },
        ];
        self.record(kind, edits, cursor_before, cursor_after);
    }

    fn record(
        &mut self,
        kind: UndoKind,
        edits: Vec<Edit>,
        cursor_before: Coordinate,
        cursor_after: Coordinate,
    ) {
        if edits.iter().all(|e| e.text().is_empty()) {
            return;
        }
        self.discard_redo();

        if let Some(block) = &mut self.block {
            block.edits.extend(edits);
            block.cursor_after = cursor_after;
            return;
        }

        if !self.sealed {
            if let Some(last) = self.undo_stack.last_mut() {
                if last.coalesce(kind, &edits) {
                    last.cursor_after = cursor_after;
                    return;
                }
            }
        }

        self.push(Entry {
            kind,
            edits,
            cursor_before,
            cursor_after,
        });
        self.sealed = false;
    }

    /// Open a block; everything until the matching [`end_block`] undoes as
    /// one step.
    ///
    /// [`end_block`]: Self::end_block
    pub fn start_block(&mut self, kind: UndoKind, cursor: Coordinate) {
        if self.depth == 0 {
            self.block = Some(Entry {
                kind,
                edits: Vec::new(),
                cursor_before: cursor,
                cursor_after: cursor,
            });
        }
        self.depth += 1;
    }

    /// Close a block. Unbalanced calls are ignored.
    pub fn end_block(&mut self, cursor: Coordinate) {
        if self.depth == 0 {
            return;
        }
        self.depth -= 1;
        if self.depth > 0 {
            return;
        }
        if let Some(mut block) = self.block.take() {
            if !block.edits.is_empty() {
                block.cursor_after = cursor;
                self.push(block);
            }
        }
        self.sealed = true;
    }

    /// Prevent the next record from merging into the current entry.
    pub const fn seal(&mut self) {
        self.sealed = true;
    }

    fn push(&mut self, entry: Entry) {
        self.undo_stack.push(entry);
        if self.limit > 0 && self.undo_stack.len() > self.limit {
            self.undo_stack.remove(0);
            self.mark = self.mark.and_then(|m| m.checked_sub(1));
        }
    }

    fn discard_redo(&mut self) {
        if self.redo_stack.is_empty() {
            return;
        }
        self.redo_stack.clear();
        if self.mark.is_some_and(|m| m > self.undo_stack.len()) {
            self.mark = None;
        }
    }

    fn close_open_block(&mut self) {
        if self.depth > 0 {
            let cursor = self
                .block
                .as_ref()
                .map_or(Coordinate::ZERO, |b| b.cursor_after);
            self.depth = 1;
            self.end_block(cursor);
        }
    }

    // -- Undo / redo --------------------------------------------------------

    /// Revert the most recent entry. Returns the cursor to restore, or
    /// `None` when there is nothing to undo.
    pub fn undo(&mut self, doc: &mut impl Editable) -> Option<Coordinate> {
        self.close_open_block();
        let entry = self.undo_stack.pop()?;
        entry.undo(doc);
        debug!(target: "tw.text.undo", kind = ?entry.kind, edits = entry.edits.len(), "undo");
        let cursor = entry.cursor_before;
        self.redo_stack.push(entry);
        self.sealed = true;
        Some(cursor)
    }

    /// Re-apply the most recently undone entry. Returns the cursor to
    /// restore, or `None` when there is nothing to redo.
    pub fn redo(&mut self, doc: &mut impl Editable) -> Option<Coordinate> {
        let entry = self.redo_stack.pop()?;
        entry.redo(doc);
        debug!(target: "tw.text.undo", kind = ?entry.kind, edits = entry.edits.len(), "redo");
        let cursor = entry.cursor_after;
        self.undo_stack.push(entry);
        self.sealed = true;
        Some(cursor)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || self.block.as_ref().is_some_and(|b| !b.edits.is_empty())
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    // -- Save point ---------------------------------------------------------

    /// Mark the current state as unmodified.
    pub fn set_mark(&mut self) {
        self.mark = Some(self.undo_stack.len());
        self.sealed = true;
    }

    /// Whether the document differs from the last [`set_mark`] state.
    ///
    /// [`set_mark`]: Self::set_mark
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.mark != Some(self.undo_stack.len())
            || self.block.as_ref().is_some_and(|b| !b.edits.is_empty())
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        *self = Self::with_limit(self.limit);
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The coordinate just past `text` when inserted at `start`.
pub(crate) fn end_after_insert(start: Coordinate, text: &str) -> Coordinate {
    match text.rfind('\n') {
        None => Coordinate::new(start.line, start.pos + text.len()),
        Some(last) => Coordinate::new(
            start.line + text.matches('\n').count(),
            text.len() - last - 1,
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// A minimal line-vector document.
    struct Doc(Vec<String>);

    impl Doc {
        fn new(text: &str) -> Self {
            Self(text.split('\n').map(String::from).collect())
        }

        fn text(&self) -> String {
            self.0.join("\n")
        }

        fn offset(&self, c: Coordinate) -> usize {
            self.0[..c.line].iter().map(|l| l.len() + 1).sum::<usize>() + c.pos
        }

        fn insert(&mut self, at: Coordinate, text: &str) {
            let mut all = self.text();
            all.insert_str(self.offset(at), text);
            *self = Self::new(&all);
        }
    }

    impl Editable for Doc {
        fn insert_text(&mut self, at: Coordinate, text: &str) {
            self.insert(at, text);
        }

        fn delete_text(&mut self, start: Coordinate, end: Coordinate) {
            let mut all = self.text();
            all.replace_range(self.offset(start)..self.offset(end), "");
            *self = Self::new(&all);
        }
    }

    fn c(line: usize, pos: usize) -> Coordinate {
        Coordinate::new(line, pos)
    }

    /// Type `text` at `at` one character at a time, recording each.
    fn type_chars(doc: &mut Doc, h: &mut History, mut at: Coordinate, text: &str) {
        for ch in text.chars() {
            let s = ch.to_string();
            doc.insert(at, &s);
            let after = c(at.line, at.pos + s.len());
            h.record_insert(UndoKind::InsertChar, at, &s, at, after);
            at = after;
        }
    }

    // -- end_after_insert ---------------------------------------------------

    #[test]
    fn end_after_insert_positions() {
        assert_eq!(end_after_insert(c(0, 0), "hello"), c(0, 5));
        assert_eq!(end_after_insert(c(3, 5), "hi"), c(3, 7));
        assert_eq!(end_after_insert(c(3, 5), "hi\nthere"), c(4, 5));
        assert_eq!(end_after_insert(c(0, 2), "a\n"), c(1, 0));
        assert_eq!(end_after_insert(c(0, 0), "a\nb\nc"), c(2, 1));
    }

    // -- Coalescing ---------------------------------------------------------

    #[test]
    fn typing_coalesces_into_one_step() {
        let mut doc = Doc::new("");
        let mut h = History::new();
        type_chars(&mut doc, &mut h, c(0, 0), "hello");
        assert_eq!(h.undo_count(), 1);

        assert_eq!(h.undo(&mut doc), Some(c(0, 0)));
        assert_eq!(doc.text(), "");
        assert_eq!(h.redo(&mut doc), Some(c(0, 5)));
        assert_eq!(doc.text(), "hello");
    }

    #[test]
    fn non_adjacent_insert_starts_new_entry() {
        let mut doc = Doc::new("");
        let mut h = History::new();
        type_chars(&mut doc, &mut h, c(0, 0), "ab");
        type_chars(&mut doc, &mut h, c(0, 0), "x");
        assert_eq!(h.undo_count(), 2);
        h.undo(&mut doc);
        assert_eq!(doc.text(), "ab");
    }

    #[test]
    fn backspaces_coalesce_backwards() {
        let mut doc = Doc::new("hello");
        let mut h = History::new();
        for pos in (3..5).rev() {
            let removed = doc.0[0][pos..=pos].to_string();
            doc.delete_text(c(0, pos), c(0, pos + 1));
            h.record_delete(UndoKind::Backspace, c(0, pos), &removed, c(0, pos + 1), c(0, pos));
        }
        assert_eq!(doc.text(), "hel");
        assert_eq!(h.undo_count(), 1);
        assert_eq!(h.undo(&mut doc), Some(c(0, 5)));
        assert_eq!(doc.text(), "hello");
    }

    #[test]
    fn forward_deletes_coalesce() {
        let mut doc = Doc::new("abcd");
        let mut h = History::new();
        for _ in 0..2 {
            let removed = doc.0[0][1..2].to_string();
            doc.delete_text(c(0, 1), c(0, 2));
            h.record_delete(UndoKind::DeleteChar, c(0, 1), &removed, c(0, 1), c(0, 1));
        }
        assert_eq!(doc.text(), "ad");
        assert_eq!(h.undo_count(), 1);
        h.undo(&mut doc);
        assert_eq!(doc.text(), "abcd");
    }

    #[test]
    fn overwrites_coalesce() {
        let mut doc = Doc::new("abc");
        let mut h = History::new();
        for (i, ch) in ["X", "Y"].iter().enumerate() {
            let old = doc.0[0][i..=i].to_string();
            doc.delete_text(c(0, i), c(0, i + 1));
            doc.insert(c(0, i), ch);
            h.record_replace(UndoKind::Overwrite, c(0, i), &old, ch, c(0, i), c(0, i + 1));
        }
        assert_eq!(doc.text(), "XYc");
        assert_eq!(h.undo_count(), 1);
        h.undo(&mut doc);
        assert_eq!(doc.text(), "abc");
        h.redo(&mut doc);
        assert_eq!(doc.text(), "XYc");
    }

    #[test]
    fn seal_blocks_merging() {
        let mut doc = Doc::new("");
        let mut h = History::new();
        type_chars(&mut doc, &mut h, c(0, 0), "ab");
        h.seal();
        type_chars(&mut doc, &mut h, c(0, 2), "cd");
        assert_eq!(h.undo_count(), 2);
    }

    #[test]
    fn different_kinds_do_not_merge() {
        let mut doc = Doc::new("ab");
        let mut h = History::new();
        type_chars(&mut doc, &mut h, c(0, 2), "c");
        doc.delete_text(c(0, 2), c(0, 3));
        h.record_delete(UndoKind::Backspace, c(0, 2), "c", c(0, 3), c(0, 2));
        assert_eq!(h.undo_count(), 2);
    }

    // -- Blocks -------------------------------------------------------------

    #[test]
    fn block_groups_edits() {
        let mut doc = Doc::new("one\ntwo");
        let mut h = History::new();
        h.start_block(UndoKind::Indent, c(0, 0));
        for line in 0..2 {
            doc.insert(c(line, 0), "\t");
            h.record_insert(UndoKind::InsertChar, c(line, 0), "\t", c(line, 0), c(line, 1));
        }
        h.end_block(c(1, 1));
        assert_eq!(doc.text(), "\tone\n\ttwo");
        assert_eq!(h.undo_count(), 1);

        assert_eq!(h.undo(&mut doc), Some(c(0, 0)));
        assert_eq!(doc.text(), "one\ntwo");
        assert_eq!(h.redo(&mut doc), Some(c(1, 1)));
        assert_eq!(doc.text(), "\tone\n\ttwo");
    }

    #[test]
    fn nested_blocks_form_one_entry() {
        let mut doc = Doc::new("");
        let mut h = History::new();
        h.start_block(UndoKind::InsertBlock, c(0, 0));
        type_chars(&mut doc, &mut h, c(0, 0), "a");
        h.start_block(UndoKind::InsertBlock, c(0, 1));
        type_chars(&mut doc, &mut h, c(0, 1), "b");
        h.end_block(c(0, 2));
        type_chars(&mut doc, &mut h, c(0, 2), "c");
        h.end_block(c(0, 3));
        assert_eq!(h.undo_count(), 1);
        h.undo(&mut doc);
        assert_eq!(doc.text(), "");
    }

    #[test]
    fn empty_block_is_dropped() {
        let mut h = History::new();
        h.start_block(UndoKind::Indent, c(0, 0));
        h.end_block(c(0, 0));
        assert_eq!(h.undo_count(), 0);
        assert!(!h.can_undo());
    }

    #[test]
    fn undo_inside_open_block_closes_it() {
        let mut doc = Doc::new("");
        let mut h = History::new();
        h.start_block(UndoKind::InsertBlock, c(0, 0));
        type_chars(&mut doc, &mut h, c(0, 0), "xy");
        assert!(h.can_undo());
        h.undo(&mut doc);
        assert_eq!(doc.text(), "");
    }

    #[test]
    fn block_after_typing_does_not_merge() {
        let mut doc = Doc::new("");
        let mut h = History::new();
        type_chars(&mut doc, &mut h, c(0, 0), "a");
        h.start_block(UndoKind::InsertBlock, c(0, 1));
        type_chars(&mut doc, &mut h, c(0, 1), "b");
        h.end_block(c(0, 2));
        type_chars(&mut doc, &mut h, c(0, 2), "c");
        assert_eq!(h.undo_count(), 3);
    }

    // -- Redo invalidation --------------------------------------------------

    #[test]
    fn new_edit_clears_redo() {
        let mut doc = Doc::new("");
        let mut h = History::new();
        type_chars(&mut doc, &mut h, c(0, 0), "ab");
        h.undo(&mut doc);
        assert!(h.can_redo());
        type_chars(&mut doc, &mut h, c(0, 0), "z");
        assert!(!h.can_redo());
        assert_eq!(h.redo(&mut doc), None);
    }

    #[test]
    fn empty_stacks_are_no_ops() {
        let mut doc = Doc::new("x");
        let mut h = History::new();
        assert_eq!(h.undo(&mut doc), None);
        assert_eq!(h.redo(&mut doc), None);
        assert_eq!(doc.text(), "x");
    }

    #[test]
    fn multiline_insert_round_trip() {
        let mut doc = Doc::new("ab");
        let mut h = History::new();
        doc.insert(c(0, 1), "X\nY");
        h.record_insert(UndoKind::InsertBlock, c(0, 1), "X\nY", c(0, 1), c(1, 1));
        assert_eq!(doc.text(), "aX\nYb");
        h.undo(&mut doc);
        assert_eq!(doc.text(), "ab");
        h.redo(&mut doc);
        assert_eq!(doc.text(), "aX\nYb");
    }

    // -- Limit and save point -----------------------------------------------

    #[test]
    fn limit_drops_oldest() {
        let mut doc = Doc::new("");
        let mut h = History::with_limit(2);
        for (i, ch) in ["a", "b", "c"].iter().enumerate() {
            h.seal();
            type_chars(&mut doc, &mut h, c(0, i), ch);
        }
        assert_eq!(h.undo_count(), 2);
        h.undo(&mut doc);
        h.undo(&mut doc);
        assert_eq!(doc.text(), "a");
        assert_eq!(h.undo(&mut doc), None);
    }

    #[test]
    fn modified_tracks_mark() {
        let mut doc = Doc::new("");
        let mut h = History::new();
        assert!(!h.is_modified());
        type_chars(&mut doc, &mut h, c(0, 0), "ab");
        assert!(h.is_modified());
        h.set_mark();
        assert!(!h.is_modified());

        // set_mark seals, so this is a fresh entry
        type_chars(&mut doc, &mut h, c(0, 2), "c");
        assert!(h.is_modified());
        h.undo(&mut doc);
        assert!(!h.is_modified());
    }

    #[test]
    fn mark_lost_when_branch_discarded() {
        let mut doc = Doc::new("");
        let mut h = History::new();
        type_chars(&mut doc, &mut h, c(0, 0), "a");
        h.set_mark();
        h.undo(&mut doc);
        type_chars(&mut doc, &mut h, c(0, 0), "b");
        assert!(h.is_modified());
    }
}
