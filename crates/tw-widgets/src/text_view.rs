//! Multi-line editing widget over a [`TextBuffer`].
//!
//! The view scrolls in both directions and never wraps. It keeps the
//! cursor on screen after every key, remembers the screen column across
//! vertical moves, and repaints when the buffer reports a change through
//! its rewrap signal.

use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

use tracing::trace;
use tw_term::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind, Rect, Signal, Surface};
use tw_text::{Coordinate, PaintInfo, SelectionMode, TextBuffer};

use crate::context::Context;
use crate::key_binding::Action;
use crate::widget::{EventResult, FocusChange, Widget, WidgetBase};

/// Lines moved per scroll-wheel step.
const SCROLL_STEP: usize = 3;

pub struct TextView {
    base: WidgetBase,
    buffer: TextBuffer,
    ctx: Context,
    top: usize,
    leftcol: usize,
    focus: bool,
    overwrite: bool,
    /// Set from the buffer's rewrap signal.
    changed: Rc<Cell<bool>>,
    /// The insert-special action was pressed.
    pub insert_special: Signal<()>,
}

impl TextView {
    #[must_use]
    pub fn new(ctx: &Context, width: u16, height: u16) -> Self {
        Self::with_buffer(ctx, TextBuffer::new(), width, height)
    }

    #[must_use]
    pub fn with_buffer(ctx: &Context, mut buffer: TextBuffer, width: u16, height: u16) -> Self {
        buffer.set_undo_limit(ctx.settings.undo_limit);
        let changed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&changed);
        buffer.rewrap.connect(move |_| flag.set(true));
        Self {
            base: WidgetBase::new(width, height),
            buffer,
            ctx: ctx.clone(),
            top: 0,
            leftcol: 0,
            focus: false,
            overwrite: false,
            changed,
            insert_special: Signal::new(),
        }
    }

    #[must_use]
    pub const fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Direct buffer access. The view repaints on the next update if the
    /// buffer reports a change.
    pub const fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Replace the content and scroll back to the top.
    pub fn set_text(&mut self, text: &str) {
        self.buffer.set_text(text);
        self.top = 0;
        self.leftcol = 0;
        self.base.force_redraw();
    }

    #[must_use]
    pub const fn cursor(&self) -> Coordinate {
        self.buffer.cursor()
    }

    /// First visible line.
    #[must_use]
    pub const fn top(&self) -> usize {
        self.top
    }

    #[must_use]
    pub const fn leftcol(&self) -> usize {
        self.leftcol
    }

    #[must_use]
    pub const fn is_overwrite(&self) -> bool {
        self.overwrite
    }

    const fn tabsize(&self) -> usize {
        self.ctx.settings.tabsize
    }

    fn cursor_column(&self) -> usize {
        self.buffer.calculate_screen_pos(self.buffer.cursor(), self.tabsize())
    }

    /// Scroll so the cursor is visible.
    pub fn ensure_cursor_visible(&mut self) {
        let Rect { w, h, .. } = self.base.rect();
        let (w, h) = (usize::from(w).max(1), usize::from(h).max(1));
        let line = self.buffer.cursor().line;
        if line < self.top {
            self.top = line;
        } else if line >= self.top + h {
            self.top = line + 1 - h;
        }

        let col = self.cursor_column();
        let glyph = self.buffer.width_at_cursor().max(1);
        if col < self.leftcol {
            self.leftcol = col;
        } else if col + glyph > self.leftcol + w {
            self.leftcol = col + glyph - w;
        }
        self.base.force_redraw();
    }

    // -- Navigation ---------------------------------------------------------

    fn move_to_line(&mut self, line: usize) {
        let pos = self
            .buffer
            .calculate_line_pos(line, self.buffer.last_set_pos, self.tabsize());
        self.buffer.goto_pos(line, pos);
    }

    fn navigate(&mut self, code: KeyCode, shift: bool, ctrl: bool) {
        if self.buffer.before_navigation(shift) {
            self.base.force_redraw();
        }
        let c = self.buffer.cursor();
        let page = usize::from(self.base.rect().h).saturating_sub(1).max(1);
        let last = self.buffer.size() - 1;
        let mut vertical = false;

        match code {
            KeyCode::Left if ctrl => self.buffer.goto_previous_word(),
            KeyCode::Left if c.pos == 0 => {
                if c.line > 0 {
                    self.buffer.goto_pos(c.line - 1, usize::MAX);
                }
            }
            KeyCode::Left => self.buffer.adjust_position(-1),
            KeyCode::Right if ctrl => self.buffer.goto_next_word(),
            KeyCode::Right if c.pos >= self.buffer.line_len(c.line) => {
                if c.line < last {
                    self.buffer.goto_pos(c.line + 1, 0);
                }
            }
            KeyCode::Right => self.buffer.adjust_position(1),
            KeyCode::Home if ctrl => self.buffer.goto_pos(0, 0),
            KeyCode::Home => self.buffer.goto_pos(c.line, 0),
            KeyCode::End if ctrl => {
                let end = self.buffer.end();
                self.buffer.goto_pos(end.line, end.pos);
            }
            KeyCode::End => self.buffer.goto_pos(c.line, usize::MAX),
            KeyCode::Up => {
                vertical = true;
                if c.line > 0 {
                    self.move_to_line(c.line - 1);
                }
            }
            KeyCode::Down => {
                vertical = true;
                if c.line < last {
                    self.move_to_line(c.line + 1);
                }
            }
            KeyCode::PageUp => {
                vertical = true;
                self.top = self.top.saturating_sub(page);
                self.move_to_line(c.line.saturating_sub(page));
            }
            KeyCode::PageDown => {
                vertical = true;
                self.top = (self.top + page).min(last);
                self.move_to_line((c.line + page).min(last));
            }
            _ => return,
        }

        if !vertical {
            self.buffer.last_set_pos = self.cursor_column();
        }
        self.buffer.set_selection_end();
    }

    // -- Editing ------------------------------------------------------------

    fn tab(&mut self, shift: bool) {
        let tabsize = self.tabsize();
        let has_selection = !self.buffer.selection_empty();
        if shift {
            if has_selection {
                self.buffer.unindent_selection(tabsize);
            } else {
                self.buffer.unindent_line(tabsize);
            }
        } else if has_selection {
            self.buffer.indent_selection(tabsize, self.ctx.settings.tab_spaces);
        } else if self.ctx.settings.tab_spaces {
            let stop = tabsize.max(1);
            let fill = stop - self.cursor_column() % stop;
            self.buffer.insert_block(&" ".repeat(fill));
        } else {
            self.buffer.insert_char('\t');
        }
    }

    fn type_char(&mut self, ch: char) {
        if self.overwrite {
            self.buffer.overwrite_char(ch);
        } else {
            self.buffer.insert_char(ch);
        }
    }

    fn paste(&mut self, clipboard: bool) {
        let text = {
            let _lock = self.ctx.clipboard.lock();
            if clipboard {
                self.ctx.clipboard.get_clipboard()
            } else {
                self.ctx.clipboard.get_primary()
            }
        };
        if let Some(text) = text {
            self.buffer.replace_selection(&text);
        }
    }

    fn run_action(&mut self, action: Action) {
        trace!(target: "tw.widgets.view", %action, "action");
        match action {
            Action::Cut | Action::Copy => {
                if let Some(text) = self.buffer.selection_text() {
                    self.ctx.clipboard.set_clipboard(Some(text));
                    if action == Action::Cut {
                        self.buffer.delete_selection();
                    }
                }
            }
            Action::Paste => self.paste(true),
            Action::PasteSelection => self.paste(false),
            Action::MarkSelection => self.buffer.toggle_mark(),
            Action::SelectAll => self.buffer.select_all(),
            Action::Undo => {
                self.buffer.apply_undo();
            }
            Action::Redo => {
                self.buffer.apply_redo();
            }
            Action::InsertSpecial => self.insert_special.emit(&()),
        }
    }

    // -- Mouse --------------------------------------------------------------

    fn coordinate_at(&self, col: u16, row: u16) -> Coordinate {
        let line = (self.top + usize::from(row)).min(self.buffer.size() - 1);
        let pos = self
            .buffer
            .calculate_line_pos(line, self.leftcol + usize::from(col), self.tabsize());
        Coordinate::new(line, pos)
    }

    fn move_cursor_to(&mut self, c: Coordinate) {
        self.buffer.goto_pos(c.line, c.pos);
        self.buffer.last_set_pos = self.cursor_column();
    }

    // -- Painting -----------------------------------------------------------

    fn paint(&mut self) {
        let Rect { w, h, .. } = self.base.rect();
        let styles = self.ctx.styles;
        let tabsize = self.tabsize();
        let selection = self.buffer.selection_range();

        let win = &mut self.base.window;
        for row in 0..h {
            let idx = self.top + usize::from(row);
            win.set_paint(row, 0);
            if let Some(line) = self.buffer.line(idx) {
                line.paint(
                    win,
                    &PaintInfo {
                        leftcol: self.leftcol,
                        width: usize::from(w),
                        tabsize,
                        selection: selection.and_then(|s| s.on_line(idx, line.len())),
                        normal: styles.normal,
                        selected: styles.selected,
                    },
                );
            }
            win.clrtoeol();
        }

        if self.focus {
            let c = self.buffer.cursor();
            let col = self
                .buffer
                .calculate_screen_pos(c, tabsize)
                .saturating_sub(self.leftcol);
            let row = c.line.saturating_sub(self.top);
            win.set_cursor(
                u16::try_from(row).unwrap_or(u16::MAX),
                u16::try_from(col).unwrap_or(u16::MAX),
            );
        }
    }
}

impl Widget for TextView {
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
        if let Some(action) = self.ctx.bindings.find_action(&key) {
            self.run_action(action);
            self.ensure_cursor_visible();
            return EventResult::Consumed;
        }

        let shift = key.has_shift();
        let ctrl = key.has_ctrl();
        let plain = key.modifiers.is_empty();
        match key.code {
            KeyCode::Left
            | KeyCode::Right
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::Home
            | KeyCode::End
            | KeyCode::PageUp
            | KeyCode::PageDown
                if !key.has_alt() =>
            {
                self.navigate(key.code, shift, ctrl);
            }
            KeyCode::Enter if plain => {
                self.buffer.break_line();
            }
            KeyCode::Backspace if ctrl => {
                self.buffer.backspace_word();
            }
            KeyCode::Backspace if plain => {
                self.buffer.backspace_char();
            }
            KeyCode::Delete if plain => {
                self.buffer.delete_char();
            }
            KeyCode::Tab if key.modifiers_without_shift().is_empty() => self.tab(shift),
            KeyCode::Insert if plain => self.overwrite = !self.overwrite,
            _ => match key.printable() {
                Some(ch) if !ch.is_control() => self.type_char(ch),
                _ => return EventResult::Ignored,
            },
        }
        self.ensure_cursor_visible();
        EventResult::Consumed
    }

    fn process_mouse_event(&mut self, event: MouseEvent) -> bool {
        match event.kind {
            MouseEventKind::ScrollUp => {
                self.top = self.top.saturating_sub(SCROLL_STEP);
                self.base.force_redraw();
                return true;
            }
            MouseEventKind::ScrollDown => {
                self.top = (self.top + SCROLL_STEP).min(self.buffer.size() - 1);
                self.base.force_redraw();
                return true;
            }
            _ => {}
        }

        let Some((col, row)) = self.base.window.relative(event.x, event.y) else {
            if event.kind == MouseEventKind::Release(MouseButton::Left) {
                if let Some(text) = self.buffer.selection_text() {
                    self.ctx.clipboard.set_primary(Some(text));
                }
            }
            return false;
        };
        let target = self.coordinate_at(col, row);

        match event.kind {
            MouseEventKind::Press(MouseButton::Left) => {
                if event.has_shift() {
                    if self.buffer.selection_mode() == SelectionMode::None {
                        self.buffer.set_selection_mode(SelectionMode::Shift);
                    }
                    self.move_cursor_to(target);
                    self.buffer.set_selection_end();
                } else {
                    self.buffer.set_selection_mode(SelectionMode::None);
                    self.move_cursor_to(target);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.buffer.selection_mode() == SelectionMode::None {
                    self.buffer.set_selection_mode(SelectionMode::Shift);
                }
                self.move_cursor_to(target);
                self.buffer.set_selection_end();
            }
            MouseEventKind::Release(MouseButton::Left) => {
                if let Some(text) = self.buffer.selection_text() {
                    self.ctx.clipboard.set_primary(Some(text));
                }
            }
            MouseEventKind::Press(MouseButton::Middle) => {
                self.buffer.set_selection_mode(SelectionMode::None);
                self.move_cursor_to(target);
                self.paste(false);
            }
            _ => return false,
        }
        self.ensure_cursor_visible();
        true
    }

    fn set_focus(&mut self, focus: FocusChange) {
        self.focus = focus.is_in();
        self.base.force_redraw();
    }

    fn set_size(&mut self, width: u16, height: u16) -> bool {
        let resized = self.base.resize(width, height);
        self.ensure_cursor_visible();
        resized
    }

    fn update_contents(&mut self) {
        if self.changed.replace(false) {
            self.base.force_redraw();
        }
        if !self.base.take_redraw() {
            return;
        }
        self.paint();
    }
}

impl std::fmt::Debug for TextView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextView")
            .field("buffer", &self.buffer)
            .field("top", &self.top)
            .field("leftcol", &self.leftcol)
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tw_term::Attr;

    use super::*;

    fn view(text: &str, width: u16, height: u16) -> TextView {
        let mut v = TextView::new(&Context::default(), width, height);
        v.set_text(text);
        v
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    fn type_str(v: &mut TextView, s: &str) {
        for ch in s.chars() {
            v.process_key(KeyEvent::char(ch));
        }
    }

    // -- Editing ------------------------------------------------------------

    #[test]
    fn typing_and_enter() {
        let mut v = view("", 20, 5);
        type_str(&mut v, "ab");
        v.process_key(key(KeyCode::Enter));
        type_str(&mut v, "c");
        assert_eq!(v.text(), "ab\nc");
        assert_eq!(v.cursor(), Coordinate::new(1, 1));
    }

    #[test]
    fn backspace_joins_lines() {
        let mut v = view("ab\ncd", 20, 5);
        v.process_key(key(KeyCode::Down));
        v.process_key(key(KeyCode::Home));
        v.process_key(key(KeyCode::Backspace));
        assert_eq!(v.text(), "abcd");
        assert_eq!(v.cursor(), Coordinate::new(0, 2));
    }

    #[test]
    fn overwrite_mode_replaces() {
        let mut v = view("abc", 20, 5);
        v.process_key(key(KeyCode::Insert));
        assert!(v.is_overwrite());
        type_str(&mut v, "X");
        assert_eq!(v.text(), "Xbc");
    }

    #[test]
    fn tab_indents_selection_as_one_undo_step() {
        let mut v = view("a\nb", 20, 5);
        v.process_key(KeyEvent::char('a').ctrl());
        v.process_key(key(KeyCode::Tab));
        assert_eq!(v.text(), "\ta\n\tb");
        v.process_key(KeyEvent::char('z').ctrl());
        assert_eq!(v.text(), "a\nb");
    }

    // -- Navigation and selection -------------------------------------------

    #[test]
    fn vertical_moves_keep_column() {
        let mut v = view("abcdef\nab\nabcdef", 20, 5);
        v.process_key(key(KeyCode::End));
        v.process_key(key(KeyCode::Down));
        assert_eq!(v.cursor(), Coordinate::new(1, 2));
        v.process_key(key(KeyCode::Down));
        assert_eq!(v.cursor(), Coordinate::new(2, 6));
    }

    #[test]
    fn horizontal_moves_cross_lines() {
        let mut v = view("ab\ncd", 20, 5);
        v.process_key(key(KeyCode::End));
        v.process_key(key(KeyCode::Right));
        assert_eq!(v.cursor(), Coordinate::new(1, 0));
        v.process_key(key(KeyCode::Left));
        assert_eq!(v.cursor(), Coordinate::new(0, 2));
    }

    #[test]
    fn shift_down_then_cut() {
        let ctx = Context::default();
        let mut v = TextView::new(&ctx, 20, 5);
        v.set_text("one\ntwo\nthree");
        v.process_key(key(KeyCode::Down).shift());
        v.process_key(KeyEvent::char('x').ctrl());
        assert_eq!(v.text(), "two\nthree");
        assert_eq!(ctx.clipboard.get_clipboard().as_deref(), Some("one\n"));

        v.process_key(key(KeyCode::End));
        v.process_key(KeyEvent::char('v').ctrl());
        assert_eq!(v.text(), "twoone\n\nthree");
    }

    #[test]
    fn plain_move_drops_shift_selection() {
        let mut v = view("hello", 20, 5);
        v.process_key(key(KeyCode::Right).shift());
        assert!(!v.buffer().selection_empty());
        v.process_key(key(KeyCode::Right));
        assert!(v.buffer().selection_range().is_none());
    }

    // -- Scrolling and painting ---------------------------------------------

    #[test]
    fn ctrl_end_scrolls_to_bottom() {
        let text = (0..10).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let mut v = view(&text, 10, 3);
        v.process_key(key(KeyCode::End).ctrl());
        assert_eq!(v.top(), 7);
        v.update_contents();
        assert_eq!(v.window().row_text(0), "line 7    ");
        assert_eq!(v.window().row_text(2), "line 9    ");
    }

    #[test]
    fn long_line_scrolls_horizontally() {
        let mut v = view("", 4, 1);
        type_str(&mut v, "abcdef");
        assert_eq!(v.leftcol(), 3);
        v.process_key(key(KeyCode::Home));
        assert_eq!(v.leftcol(), 0);
    }

    #[test]
    fn paints_lines_and_selection() {
        let mut v = view("hello\nworld", 8, 3);
        v.process_key(key(KeyCode::Right).shift());
        v.update_contents();
        assert_eq!(v.window().row_text(0), "hello   ");
        assert_eq!(v.window().row_text(1), "world   ");
        assert_eq!(v.window().row_text(2), "        ");
        assert!(v.window().cell(0, 0).unwrap().style.attr.contains(Attr::REVERSE));
        assert!(!v.window().cell(1, 0).unwrap().style.attr.contains(Attr::REVERSE));
    }

    #[test]
    fn buffer_changes_trigger_repaint() {
        let mut v = view("old", 8, 1);
        v.update_contents();
        v.buffer_mut().set_text("new");
        v.update_contents();
        assert_eq!(v.window().row_text(0), "new     ");
    }

    // -- Mouse --------------------------------------------------------------

    #[test]
    fn click_drag_release_selects_into_primary() {
        let ctx = Context::default();
        let mut v = TextView::new(&ctx, 20, 5);
        v.set_text("hello\nworld");
        let press = MouseEvent::new(MouseEventKind::Press(MouseButton::Left), 2, 1);
        assert!(v.process_mouse_event(press));
        assert_eq!(v.cursor(), Coordinate::new(1, 2));
        v.process_mouse_event(MouseEvent::new(MouseEventKind::Drag(MouseButton::Left), 4, 1));
        v.process_mouse_event(MouseEvent::new(MouseEventKind::Release(MouseButton::Left), 4, 1));
        assert_eq!(ctx.clipboard.get_primary().as_deref(), Some("rl"));
    }

    #[test]
    fn wheel_scrolls() {
        let text = (0..10).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut v = view(&text, 4, 3);
        v.process_mouse_event(MouseEvent::new(MouseEventKind::ScrollDown, 0, 0));
        assert_eq!(v.top(), 3);
        v.process_mouse_event(MouseEvent::new(MouseEventKind::ScrollUp, 0, 0));
        assert_eq!(v.top(), 0);
    }
}
