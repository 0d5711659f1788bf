//! Single-line text entry with optional autocompletion.
//!
//! A [`TextField`] owns one [`Line`], a byte-offset cursor, a horizontal
//! scroll offset and a [`Selection`]. Keys are handled in a fixed order:
//!
//! 1. an open completion list gets first look,
//! 2. shift/plain navigation keys start or end a shift selection,
//! 3. navigation and editing keys,
//! 4. bound actions (clipboard, mark, select all, undo),
//! 5. literal characters, subject to the key filter.
//!
//! Any edit while a selection is active deletes the selection first.
//!
//! # Scrolling
//!
//! The field paints `[` or `(` in column 0, the text in the middle and `]`
//! or `)` in the last column; the round bracket means there is hidden text
//! on that side. The cursor column is kept inside the middle part by
//! [`ensure_cursor_on_screen`](TextField::ensure_cursor_on_screen).

use std::any::Any;
use std::rc::Rc;

use tracing::{debug, trace};
use tw_term::{KeyCode, KeyEvent, Modifiers, MouseButton, MouseEvent, MouseEventKind, Signal, Surface};
use tw_text::{Coordinate, Editable, History, Line, PaintInfo, Selection, SelectionMode, UndoKind};

use crate::completion::StringList;
use crate::context::Context;
use crate::drop_down::{DropDownList, ListKey, ListMouse};
use crate::key_binding::Action;
use crate::widget::{EventResult, FocusChange, FocusMove, Widget, WidgetBase};

/// Allow- or deny-list of characters.
#[derive(Debug, Clone)]
struct KeyFilter {
    keys: Vec<char>,
    accept: bool,
}

impl KeyFilter {
    fn allows(&self, ch: char) -> bool {
        self.keys.contains(&ch) == self.accept
    }
}

/// The field's line seen as an undo target.
struct LineDoc<'a>(&'a mut Line);

impl Editable for LineDoc<'_> {
    fn insert_text(&mut self, at: Coordinate, text: &str) {
        self.0.insert_str(at.pos, text);
    }

    fn delete_text(&mut self, start: Coordinate, end: Coordinate) {
        self.0.cut(start.pos, end.pos);
    }
}

const fn at(pos: usize) -> Coordinate {
    Coordinate::new(0, pos)
}

/// A one-line editable text widget.
pub struct TextField {
    base: WidgetBase,
    line: Line,
    pos: usize,
    screen_pos: usize,
    leftcol: usize,
    selection: Selection<usize>,
    focus: bool,
    in_drop_down: bool,
    dont_select_on_focus: bool,
    edited: bool,
    filter: Option<KeyFilter>,
    hotkey: Option<char>,
    drop_down: Option<DropDownList>,
    history: Option<History>,
    ctx: Context,
    /// Enter was pressed.
    pub activate: Signal<()>,
    /// The insert-special action fired; the application should ask for a
    /// character and pass it to [`insert_special`](Self::insert_special).
    pub insert_special: Signal<()>,
}

impl TextField {
    /// An empty field `width` columns wide.
    #[must_use]
    pub fn new(ctx: &Context, width: u16) -> Self {
        Self {
            base: WidgetBase::new(width, 1),
            line: Line::new(),
            pos: 0,
            screen_pos: 0,
            leftcol: 0,
            selection: Selection::new(),
            focus: false,
            in_drop_down: false,
            dont_select_on_focus: false,
            edited: false,
            filter: None,
            hotkey: None,
            drop_down: None,
            history: None,
            ctx: ctx.clone(),
            activate: Signal::new(),
            insert_special: Signal::new(),
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[must_use]
    pub fn text(&self) -> &str {
        self.line.as_str()
    }

    /// Cursor byte offset.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.pos
    }

    /// First visible screen column.
    #[must_use]
    pub const fn leftcol(&self) -> usize {
        self.leftcol
    }

    /// Ordered selection bounds while a selection is active.
    #[must_use]
    pub fn selection_range(&self) -> Option<(usize, usize)> {
        self.selection.range()
    }

    #[must_use]
    pub const fn selection_mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    #[must_use]
    pub const fn has_focus(&self) -> bool {
        self.focus
    }

    /// Whether keyboard focus is inside the completion list.
    #[must_use]
    pub const fn in_drop_down(&self) -> bool {
        self.in_drop_down
    }

    #[must_use]
    pub const fn drop_down(&self) -> Option<&DropDownList> {
        self.drop_down.as_ref()
    }

    /// Content changed since the last paint.
    #[must_use]
    pub const fn is_edited(&self) -> bool {
        self.edited
    }

    // -- Configuration ------------------------------------------------------

    /// Replace the text. The cursor goes to the end, undo history is
    /// dropped.
    pub fn set_text(&mut self, text: &str) {
        self.line.set_text(text);
        self.pos = self.line.len();
        self.leftcol = 0;
        self.reset_selection();
        if let Some(history) = &mut self.history {
            history.clear();
        }
        self.ensure_cursor_on_screen();
        self.content_changed();
    }

    /// Only accept characters in `keys` (`accept == true`) or only those
    /// not in it (`accept == false`). Applies to typing and pasting.
    pub fn set_key_filter(&mut self, keys: &[char], accept: bool) {
        self.filter = Some(KeyFilter {
            keys: keys.to_vec(),
            accept,
        });
    }

    pub fn clear_key_filter(&mut self) {
        self.filter = None;
    }

    /// Attach (or replace) the completion list.
    pub fn set_autocomplete(&mut self, candidates: Rc<dyn StringList>) {
        let rect = self.base.rect();
        match &mut self.drop_down {
            Some(dd) => dd.set_source(candidates),
            None => {
                let mut dd = DropDownList::new(candidates, rect.w);
                dd.anchor_below(rect);
                self.drop_down = Some(dd);
            }
        }
    }

    /// Keep an undo history for this field.
    pub fn enable_undo(&mut self) {
        if self.history.is_none() {
            self.history = Some(History::with_limit(self.ctx.settings.undo_limit));
        }
    }

    /// The hotkey of the label describing this field.
    pub const fn set_label_hotkey(&mut self, hotkey: Option<char>) {
        self.hotkey = hotkey;
    }

    // -- Selection ----------------------------------------------------------

    fn reset_selection(&mut self) {
        self.selection.reset();
        self.base.force_redraw();
    }

    /// Start or end a shift selection before a navigation key.
    fn navigation_bookkeeping(&mut self, key: &KeyEvent) {
        if matches!(
            key.code,
            KeyCode::End | KeyCode::Home | KeyCode::Left | KeyCode::Right
        ) && self.selection.before_navigation(key.has_shift(), self.pos)
        {
            self.base.force_redraw();
        }
    }

    /// Drop an empty shift selection, otherwise let its end follow the
    /// cursor.
    fn sync_selection(&mut self) {
        match self.selection.mode() {
            SelectionMode::None => {}
            SelectionMode::Shift if self.selection.start() == self.pos => self.reset_selection(),
            _ => self.selection.update_end(self.pos),
        }
    }

    /// Move the selection end to the cursor, optionally publishing the
    /// selected text as the primary selection.
    fn set_selection_end(&mut self, update_primary: bool) {
        self.selection.update_end(self.pos);
        if !update_primary {
            return;
        }
        let text = self
            .selection
            .range()
            .filter(|(s, e)| s != e)
            .map(|(s, e)| self.line.slice(s, e).to_string());
        self.ctx.clipboard.set_primary(text);
    }

    /// Remove the selected text, leaving the cursor at its start.
    fn delete_selection(&mut self, save_to_clipboard: bool) {
        let Some((start, end)) = self.selection.range() else {
            return;
        };
        if start == end {
            self.reset_selection();
            return;
        }
        let before = self.pos;
        let removed = self.line.cut(start, end);
        if save_to_clipboard {
            self.ctx.clipboard.set_clipboard(Some(removed.as_str().to_string()));
        }
        self.pos = start;
        if let Some(history) = &mut self.history {
            history.record_delete(UndoKind::DeleteBlock, at(start), removed.as_str(), at(before), at(start));
        }
        self.ensure_cursor_on_screen();
        self.reset_selection();
        self.content_changed();
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `text` at the cursor, replacing any selection.
    fn insert_at_cursor(&mut self, kind: UndoKind, text: &str) {
        let replacing = self.selection.is_active();
        if replacing {
            if let Some(history) = &mut self.history {
                history.start_block(UndoKind::ReplaceBlock, at(self.pos));
            }
            self.delete_selection(false);
        }
        let before = self.pos;
        if self.line.insert_str(before, text) {
            self.pos = before + text.len();
            if !self.line.is_boundary(self.pos) {
                self.pos = self.line.next_pos(self.pos);
            }
            if let Some(history) = &mut self.history {
                history.record_insert(kind, at(before), text, at(before), at(self.pos));
            }
        }
        if replacing {
            if let Some(history) = &mut self.history {
                history.end_block(at(self.pos));
            }
        }
        self.ensure_cursor_on_screen();
        self.content_changed();
    }

    /// Insert a character chosen through the insert-special request. The
    /// control-character check is skipped; the key filter still applies.
    pub fn insert_special(&mut self, ch: char) -> bool {
        if self.filter.as_ref().is_some_and(|f| !f.allows(ch)) {
            return false;
        }
        self.insert_at_cursor(UndoKind::InsertChar, ch.encode_utf8(&mut [0; 4]));
        true
    }

    fn backspace(&mut self, word: bool) {
        if self.selection.is_active() {
            self.delete_selection(false);
            return;
        }
        if self.pos == 0 {
            return;
        }
        let start = if word {
            self.line.previous_word(self.pos).unwrap_or(0)
        } else {
            self.line.prev_pos(self.pos)
        };
        let before = self.pos;
        let removed = self.line.cut(start, before);
        if removed.is_empty() {
            return;
        }
        self.pos = start;
        if let Some(history) = &mut self.history {
            history.record_delete(UndoKind::Backspace, at(start), removed.as_str(), at(before), at(start));
        }
        self.ensure_cursor_on_screen();
        self.content_changed();
    }

    fn delete_forward(&mut self) {
        if self.selection.is_active() {
            self.delete_selection(false);
            return;
        }
        let Some(removed) = self.line.delete_char(self.pos) else {
            return;
        };
        if let Some(history) = &mut self.history {
            history.record_delete(UndoKind::DeleteChar, at(self.pos), &removed, at(self.pos), at(self.pos));
        }
        self.content_changed();
    }

    /// Show `text` without re-filtering the completion list (a preview or
    /// a committed candidate).
    fn preview(&mut self, text: &str) {
        let old = self.line.as_str().to_string();
        self.line.set_text(text);
        if let Some(history) = &mut self.history {
            history.record_replace(UndoKind::ReplaceBlock, at(0), &old, text, at(self.pos), at(text.len()));
        }
        self.pos = self.line.len();
        self.leftcol = 0;
        self.edited = true;
        self.ensure_cursor_on_screen();
        self.base.force_redraw();
    }

    /// Mark the content changed and refresh the completion list.
    fn content_changed(&mut self) {
        self.edited = true;
        self.base.force_redraw();
        let Some(dd) = &mut self.drop_down else {
            return;
        };
        dd.update_view(self.line.as_str());
        if self.focus && !dd.is_empty() && !self.line.is_empty() {
            dd.show();
        } else {
            dd.hide();
            self.in_drop_down = false;
        }
    }

    fn apply_history(&mut self, redo: bool) -> bool {
        let Some(history) = &mut self.history else {
            return false;
        };
        let mut doc = LineDoc(&mut self.line);
        let cursor = if redo {
            history.redo(&mut doc)
        } else {
            history.undo(&mut doc)
        };
        let Some(cursor) = cursor else {
            return false;
        };
        self.pos = cursor.pos.min(self.line.len());
        self.reset_selection();
        self.ensure_cursor_on_screen();
        self.content_changed();
        true
    }

    // -- Scrolling ----------------------------------------------------------

    /// Scroll so the cursor column lies inside the visible text area.
    pub fn ensure_cursor_on_screen(&mut self) {
        let char_width = if self.pos == self.line.len() {
            1
        } else {
            self.line.width_at(self.pos)
        };
        self.screen_pos = self.line.calculate_screen_width(0, self.pos, 0);

        if self.screen_pos < self.leftcol {
            self.leftcol = self.screen_pos;
            self.base.force_redraw();
        }

        let width = usize::from(self.base.rect().w).saturating_sub(2);
        if self.screen_pos + char_width > self.leftcol + width {
            self.leftcol = (self.screen_pos + char_width).saturating_sub(width);
            self.base.force_redraw();
        }
    }

    /// Text offset under the absolute screen column `x`.
    fn pos_at_column(&self, x: u16) -> usize {
        let col = usize::from(x.saturating_sub(self.base.rect().x));
        self.line
            .calculate_line_pos(col.saturating_sub(1) + self.leftcol, 0)
    }

    // -- Keys ---------------------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent) -> EventResult {
        self.navigation_bookkeeping(&key);

        let mods = key.modifiers;
        let plain = mods.is_empty();
        let no_ctrl = key.modifiers_without_shift().is_empty();
        let ctrl_only = mods.difference(Modifiers::SHIFT) == Modifiers::CTRL;

        match key.code {
            KeyCode::Down if plain => return self.enter_drop_down(),
            KeyCode::Up if plain => return EventResult::Focus(FocusMove::Backward(1)),
            KeyCode::Backspace if mods == Modifiers::CTRL => self.backspace(true),
            KeyCode::Backspace if plain => self.backspace(false),
            KeyCode::Delete if plain => self.delete_forward(),
            KeyCode::Left if no_ctrl => self.move_cursor(self.line.prev_pos(self.pos)),
            KeyCode::Right if no_ctrl => self.move_cursor(self.line.next_pos(self.pos)),
            KeyCode::Left if ctrl_only => {
                self.move_cursor(self.line.previous_word(self.pos).unwrap_or(0));
            }
            KeyCode::Right if ctrl_only => {
                let len = self.line.len();
                self.move_cursor(self.line.next_word(self.pos).unwrap_or(len));
            }
            KeyCode::Home if no_ctrl => self.move_cursor(0),
            KeyCode::End if no_ctrl => self.move_cursor(self.line.len()),
            KeyCode::Enter if plain => {
                if let Some(dd) = &mut self.drop_down {
                    dd.hide();
                }
                self.in_drop_down = false;
                trace!(target: "tw.widgets.field", "activate");
                self.activate.emit(&());
            }
            _ => return self.handle_other(key),
        }
        EventResult::Consumed
    }

    fn move_cursor(&mut self, pos: usize) {
        self.pos = pos;
        self.ensure_cursor_on_screen();
        self.sync_selection();
        self.base.force_redraw();
    }

    fn enter_drop_down(&mut self) -> EventResult {
        let Some(dd) = &mut self.drop_down else {
            return EventResult::Focus(FocusMove::Forward(1));
        };
        if dd.is_empty() || self.line.is_empty() {
            return EventResult::Focus(FocusMove::Forward(1));
        }
        self.in_drop_down = true;
        let preview = dd.enter();
        debug!(target: "tw.widgets.field", items = dd.len(), "entered completion list");
        self.reset_selection();
        if let Some(text) = preview {
            self.preview(&text);
        }
        EventResult::Consumed
    }

    /// Bound actions, then literal insertion.
    fn handle_other(&mut self, key: KeyEvent) -> EventResult {
        if let Some(action) = self.ctx.bindings.find_action(&key) {
            return self.run_action(action);
        }
        let Some(ch) = key.printable() else {
            return EventResult::Ignored;
        };
        if ch.is_control() || self.filter.as_ref().is_some_and(|f| !f.allows(ch)) {
            return EventResult::Ignored;
        }
        self.insert_at_cursor(UndoKind::InsertChar, ch.encode_utf8(&mut [0; 4]));
        EventResult::Consumed
    }

    fn run_action(&mut self, action: Action) -> EventResult {
        trace!(target: "tw.widgets.field", %action, "action");
        match action {
            Action::Cut => {
                if self.selection.is_active() {
                    self.delete_selection(true);
                }
            }
            Action::Copy => match self.selection.range() {
                Some((s, e)) if s == e => self.reset_selection(),
                Some((s, e)) => {
                    let text = self.line.slice(s, e).to_string();
                    self.ctx.clipboard.set_clipboard(Some(text));
                }
                None => {}
            },
            Action::Paste | Action::PasteSelection => self.paste(action == Action::Paste),
            Action::MarkSelection => {
                self.selection.toggle_mark(self.pos);
                self.base.force_redraw();
            }
            Action::InsertSpecial => {
                self.dont_select_on_focus = true;
                self.insert_special.emit(&());
            }
            Action::SelectAll => {
                let mode = match self.selection.mode() {
                    SelectionMode::None => SelectionMode::Shift,
                    mode => mode,
                };
                let len = self.line.len();
                self.selection.set(mode, 0, len);
                self.pos = len;
                self.ensure_cursor_on_screen();
                self.base.force_redraw();
            }
            Action::Undo | Action::Redo => {
                if self.history.is_none() {
                    return EventResult::Ignored;
                }
                self.apply_history(action == Action::Redo);
            }
        }
        EventResult::Consumed
    }

    /// Paste the clipboard or the primary selection. The whole paste is
    /// refused when any character fails the key filter.
    fn paste(&mut self, clipboard: bool) {
        let text = {
            let _lock = self.ctx.clipboard.lock();
            if clipboard {
                self.ctx.clipboard.get_clipboard()
            } else {
                self.ctx.clipboard.get_primary()
            }
        };
        let Some(text) = text else {
            return;
        };
        if let Some(filter) = &self.filter {
            if !text.chars().all(|ch| filter.allows(ch)) {
                debug!(target: "tw.widgets.field", "paste rejected by key filter");
                return;
            }
        }
        self.insert_at_cursor(UndoKind::InsertBlock, &text);
    }

    // -- Painting -----------------------------------------------------------

    fn paint(&mut self) {
        let styles = self.ctx.styles;
        let w = self.base.rect().w;
        let text_width = usize::from(w).saturating_sub(2);
        let selection = if self.focus { self.selection.range() } else { None };
        let total = self.line.calculate_screen_width(0, self.line.len(), 0);

        let win = &mut self.base.window;
        win.set_paint(0, 0);
        win.clrtoeol();
        win.addch(if self.leftcol == 0 { '[' } else { '(' }, styles.normal);
        self.line.paint(
            win,
            &PaintInfo {
                leftcol: self.leftcol,
                width: text_width,
                tabsize: 0,
                selection,
                normal: styles.normal,
                selected: styles.selected,
            },
        );
        if w >= 1 {
            win.set_paint(0, w - 1);
            let more = total.saturating_sub(self.leftcol) > text_width;
            win.addch(if more { ')' } else { ']' }, styles.normal);
        }
        if self.focus && !self.in_drop_down {
            let col = 1 + self.screen_pos.saturating_sub(self.leftcol);
            win.set_cursor(0, u16::try_from(col).unwrap_or(u16::MAX));
        }
    }
}

impl Widget for TextField {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn process_key(&mut self, key: KeyEvent) -> EventResult {
        let outcome = match &mut self.drop_down {
            Some(dd) if dd.is_shown() => dd.process_key(key, self.in_drop_down),
            _ => ListKey::Ignored,
        };
        match outcome {
            ListKey::Consumed => return EventResult::Consumed,
            ListKey::Preview(text) => {
                self.preview(&text);
                return EventResult::Consumed;
            }
            ListKey::Exit => {
                self.in_drop_down = false;
                self.base.force_redraw();
                return EventResult::Consumed;
            }
            ListKey::ExitAndPass => {
                self.in_drop_down = false;
                self.base.force_redraw();
            }
            ListKey::Pass | ListKey::Ignored => {}
        }
        self.handle_key(key)
    }

    fn process_mouse_event(&mut self, event: MouseEvent) -> bool {
        if let Some(dd) = &mut self.drop_down {
            match dd.process_mouse_event(event) {
                ListMouse::Commit(text) => {
                    self.in_drop_down = false;
                    self.preview(&text);
                    return true;
                }
                ListMouse::Consumed => return true,
                ListMouse::Closed => {
                    self.in_drop_down = false;
                    self.base.force_redraw();
                    if !self.base.rect().contains(event.x, event.y) {
                        return false;
                    }
                }
                ListMouse::Ignored => {}
            }
        }

        let left_press = event.kind == MouseEventKind::Press(MouseButton::Left);
        if left_press && event.clicks == 3 {
            let len = self.line.len();
            self.selection.set(SelectionMode::Shift, 0, len);
            self.pos = len;
            self.set_selection_end(true);
            self.ensure_cursor_on_screen();
            self.base.force_redraw();
        } else if left_press && event.clicks == 2 {
            let start = self.line.previous_word_boundary(self.pos).unwrap_or(0);
            let len = self.line.len();
            self.pos = self.line.next_word_boundary(self.pos).unwrap_or(len);
            self.selection.set(SelectionMode::Shift, start, self.pos);
            self.set_selection_end(true);
            self.ensure_cursor_on_screen();
            self.base.force_redraw();
        } else if left_press {
            if !event.has_shift() {
                self.reset_selection();
            } else if !self.selection.is_active() {
                self.selection.set(SelectionMode::Shift, self.pos, self.pos);
            }
            self.pos = self.pos_at_column(event.x);
            if event.has_shift() {
                self.set_selection_end(false);
            }
            self.ensure_cursor_on_screen();
            self.base.force_redraw();
        } else if event.is_press(MouseButton::Middle) {
            self.reset_selection();
            self.pos = self.pos_at_column(event.x);
            let primary = {
                let _lock = self.ctx.clipboard.lock();
                self.ctx.clipboard.get_primary()
            };
            if let Some(text) = primary {
                self.insert_at_cursor(UndoKind::InsertBlock, &text);
            }
            self.ensure_cursor_on_screen();
        } else if matches!(
            event.kind,
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Release(MouseButton::Left)
        ) {
            let newpos = self.pos_at_column(event.x);
            if !self.selection.is_active() && newpos != self.pos {
                self.selection.set(SelectionMode::Shift, self.pos, self.pos);
            }
            self.pos = newpos;
            if self.selection.is_active() {
                let release = matches!(event.kind, MouseEventKind::Release(_));
                self.set_selection_end(release);
            }
            self.ensure_cursor_on_screen();
            self.base.force_redraw();
        }
        self.dont_select_on_focus = true;
        true
    }

    fn set_focus(&mut self, focus: FocusChange) {
        self.focus = focus.is_in();
        self.base.force_redraw();
        if self.focus {
            if !self.dont_select_on_focus && self.ctx.settings.select_on_focus {
                let len = self.line.len();
                self.selection.set(SelectionMode::Shift, 0, len);
                self.pos = len;
                self.set_selection_end(false);
                self.ensure_cursor_on_screen();
            }
            self.dont_select_on_focus = false;
            if let Some(dd) = &mut self.drop_down {
                dd.update_view(self.line.as_str());
            }
        } else {
            if let Some(dd) = &mut self.drop_down {
                dd.hide();
            }
            self.in_drop_down = false;
        }
    }

    fn set_size(&mut self, width: u16, _height: u16) -> bool {
        let mut ok = self.base.resize(width, 1);
        if let Some(dd) = &mut self.drop_down {
            ok &= dd.set_width(width);
        }
        self.ensure_cursor_on_screen();
        ok
    }

    fn set_position(&mut self, x: u16, y: u16) {
        self.base.set_position(x, y);
        let rect = self.base.rect();
        if let Some(dd) = &mut self.drop_down {
            dd.anchor_below(rect);
        }
    }

    fn show(&mut self) {
        self.in_drop_down = false;
        self.base.show();
    }

    fn hide(&mut self) {
        if let Some(dd) = &mut self.drop_down {
            dd.hide();
        }
        self.in_drop_down = false;
        self.base.hide();
    }

    fn force_redraw(&mut self) {
        self.base.force_redraw();
        if let Some(dd) = &mut self.drop_down {
            dd.force_redraw();
        }
    }

    fn update_contents(&mut self) {
        let styles = self.ctx.styles;
        if let Some(dd) = &mut self.drop_down {
            if !dd.is_empty() {
                dd.update_contents(&styles, self.in_drop_down);
            }
        }
        if !self.base.take_redraw() {
            return;
        }
        self.edited = false;
        self.sync_selection();
        self.paint();
    }

    fn is_hotkey(&self, ch: char) -> bool {
        self.hotkey
            .is_some_and(|h| h.to_lowercase().eq(ch.to_lowercase()))
    }

    fn mouse_grab(&self) -> bool {
        self.drop_down.as_ref().is_some_and(DropDownList::is_shown)
    }

    fn contains_point(&self, x: u16, y: u16) -> bool {
        self.is_shown()
            && (self.base.rect().contains(x, y)
                || self.drop_down.as_ref().is_some_and(|dd| dd.contains(x, y)))
    }
}

impl std::fmt::Debug for TextField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextField")
            .field("text", &self.line.as_str())
            .field("pos", &self.pos)
            .field("leftcol", &self.leftcol)
            .field("selection", &self.selection)
            .field("focus", &self.focus)
            .field("in_drop_down", &self.in_drop_down)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
