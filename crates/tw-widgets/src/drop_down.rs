//! The completion popup attached to a [`TextField`](crate::TextField).
//!
//! The list is owned by its field and never talks to it directly: key and
//! mouse handlers return a small outcome enum ([`ListKey`], [`ListMouse`])
//! and the field applies it (preview a candidate, commit it, leave the
//! list). That keeps the ownership one-way.

use std::rc::Rc;

use tw_term::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind, Rect, Surface, Window};

use crate::completion::{FilteredList, StringList};
use crate::context::Styles;
use crate::widget::paint_text;

/// Popup height, borders included.
pub const DROP_DOWN_HEIGHT: u16 = 6;

/// Candidate rows visible at once.
const VISIBLE_ROWS: usize = DROP_DOWN_HEIGHT as usize - 1;

/// What the field should do after the list saw a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListKey {
    /// Not a list key; handle it as a field key.
    Ignored,
    /// Handled by the list.
    Consumed,
    /// The highlight moved; show this candidate in the field.
    Preview(String),
    /// Focus went back to the field text.
    Exit,
    /// The field should handle the key too, staying in the list.
    Pass,
    /// Focus went back to the field, which should handle the key.
    ExitAndPass,
}

/// What the field should do after the list saw a mouse event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListMouse {
    /// A candidate was clicked; set it as the field text.
    Commit(String),
    /// A press landed outside the popup, which closed.
    Closed,
    /// Anything else on the popup.
    Consumed,
    /// Not for the popup.
    Ignored,
}

/// A prefix-filtered candidate list shown below a text field.
#[derive(Debug)]
pub struct DropDownList {
    window: Window,
    items: FilteredList,
    current: usize,
    top: usize,
    redraw: bool,
}

impl DropDownList {
    /// A hidden list over `source`, `width` columns wide.
    #[must_use]
    pub fn new(source: Rc<dyn StringList>, width: u16) -> Self {
        Self {
            window: Window::new(Rect::new(0, 0, width, DROP_DOWN_HEIGHT)),
            items: FilteredList::new(source),
            current: 0,
            top: 0,
            redraw: true,
        }
    }

    /// Swap in another candidate source, unfiltered.
    pub fn set_source(&mut self, source: Rc<dyn StringList>) {
        self.items = FilteredList::new(source);
        self.current = 0;
        self.top = 0;
        self.redraw = true;
    }

    /// Re-filter against the field text. Empty text shows everything.
    pub fn update_view(&mut self, text: &str) {
        if text.is_empty() {
            self.items.reset_filter();
        } else {
            self.items.set_filter(text);
        }
        self.current = 0;
        self.top = 0;
        self.redraw = true;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// The visible candidates, in source order.
    pub fn items(&self) -> impl Iterator<Item = &str> {
        self.items.iter()
    }

    /// Index of the highlighted candidate.
    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_item(&self) -> Option<&str> {
        self.items.get(self.current)
    }

    pub const fn show(&mut self) {
        if !self.window.is_shown() {
            self.window.show();
            self.redraw = true;
        }
    }

    pub const fn hide(&mut self) {
        self.window.hide();
    }

    #[must_use]
    pub const fn is_shown(&self) -> bool {
        self.window.is_shown()
    }

    /// Place the popup on the row below `field`.
    pub const fn anchor_below(&mut self, field: Rect) {
        self.window.anchor_below(field);
    }

    pub fn set_width(&mut self, width: u16) -> bool {
        self.redraw = true;
        self.window.resize(width, DROP_DOWN_HEIGHT)
    }

    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.window.rect()
    }

    #[must_use]
    pub const fn window(&self) -> &Window {
        &self.window
    }

    #[must_use]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        self.window.is_shown() && self.window.contains(x, y)
    }

    /// Focus moved into the list. Returns the candidate to preview.
    pub fn enter(&mut self) -> Option<String> {
        self.show();
        self.redraw = true;
        self.current_item().map(str::to_string)
    }

    /// Handle `key` while the popup is shown. `in_list` says whether the
    /// field's conceptual focus is inside the list.
    pub fn process_key(&mut self, key: KeyEvent, in_list: bool) -> ListKey {
        if !in_list {
            if key.code == KeyCode::Escape && key.modifiers.is_empty() {
                self.hide();
                return ListKey::Consumed;
            }
            return ListKey::Ignored;
        }

        match key.code {
            KeyCode::Up if self.current == 0 => {
                self.redraw = true;
                ListKey::Exit
            }
            KeyCode::Up => self.move_to(self.current - 1),
            KeyCode::Down => self.move_to(self.current + 1),
            KeyCode::PageUp => self.move_to(self.current.saturating_sub(VISIBLE_ROWS)),
            KeyCode::PageDown => self.move_to(self.current + VISIBLE_ROWS),
            KeyCode::Home | KeyCode::End => ListKey::Pass,
            KeyCode::Enter => {
                self.hide();
                ListKey::ExitAndPass
            }
            _ if key.printable().is_some_and(|ch| !ch.is_control()) => {
                self.redraw = true;
                ListKey::ExitAndPass
            }
            _ => ListKey::Pass,
        }
    }

    /// Highlight `index` (clamped) and report the preview.
    fn move_to(&mut self, index: usize) -> ListKey {
        let last = self.items.len().saturating_sub(1);
        let index = index.min(last);
        if index == self.current {
            return ListKey::Consumed;
        }
        self.current = index;
        self.scroll_to_current();
        self.redraw = true;
        self.current_item()
            .map_or(ListKey::Consumed, |s| ListKey::Preview(s.to_string()))
    }

    fn scroll_to_current(&mut self) {
        if self.current < self.top {
            self.top = self.current;
        } else if self.current >= self.top + VISIBLE_ROWS {
            self.top = self.current + 1 - VISIBLE_ROWS;
        }
    }

    /// The candidate index drawn at the absolute point, if any.
    #[must_use]
    pub fn item_at(&self, x: u16, y: u16) -> Option<usize> {
        let (col, row) = self.window.relative(x, y)?;
        let inner = col >= 1 && col + 1 < self.window.rect().w;
        let row = usize::from(row);
        if !inner || row >= VISIBLE_ROWS {
            return None;
        }
        let index = self.top + row;
        (index < self.items.len()).then_some(index)
    }

    /// Handle a mouse event while the popup is shown.
    pub fn process_mouse_event(&mut self, event: MouseEvent) -> ListMouse {
        if !self.is_shown() {
            return ListMouse::Ignored;
        }
        if !self.window.contains(event.x, event.y) {
            if matches!(event.kind, MouseEventKind::Press(_)) {
                self.hide();
                return ListMouse::Closed;
            }
            return ListMouse::Ignored;
        }
        match event.kind {
            MouseEventKind::Press(MouseButton::Left) => {
                let Some(index) = self.item_at(event.x, event.y) else {
                    return ListMouse::Consumed;
                };
                self.current = index;
                let text = self.current_item().map(str::to_string);
                self.hide();
                text.map_or(ListMouse::Consumed, ListMouse::Commit)
            }
            MouseEventKind::ScrollUp => {
                self.top = self.top.saturating_sub(1);
                self.redraw = true;
                ListMouse::Consumed
            }
            MouseEventKind::ScrollDown => {
                if self.top + VISIBLE_ROWS < self.items.len() {
                    self.top += 1;
                    self.redraw = true;
                }
                ListMouse::Consumed
            }
            _ => ListMouse::Consumed,
        }
    }

    /// Repaint when dirty. `highlight` draws the current row selected.
    pub fn update_contents(&mut self, styles: &Styles, highlight: bool) {
        if !self.redraw {
            return;
        }
        self.redraw = false;
        let w = self.window.rect().w;
        if w < 2 {
            return;
        }
        let win = &mut self.window;
        win.set_paint(0, 0);
        win.clrtobot();
        let inner = usize::from(w - 2);
        for row in 0..DROP_DOWN_HEIGHT - 1 {
            win.set_paint(row, 0);
            win.addch('│', styles.normal);
            let index = self.top + usize::from(row);
            if let Some(item) = self.items.get(index) {
                let style = if highlight && index == self.current {
                    styles.normal.combine(styles.focused)
                } else {
                    styles.normal
                };
                let text: String = item.chars().take(inner).collect();
                paint_text(win, row, 1, &text, style);
            }
            win.set_paint(row, w - 1);
            win.addch('│', styles.normal);
        }
        win.set_paint(DROP_DOWN_HEIGHT - 1, 0);
        win.addch('└', styles.normal);
        for _ in 0..w - 2 {
            win.addch('─', styles.normal);
        }
        win.addch('┘', styles.normal);
    }

    pub const fn force_redraw(&mut self) {
        self.redraw = true;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn list(items: &[&'static str]) -> DropDownList {
        let source: Rc<dyn StringList> = Rc::new(items.to_vec());
        let mut dd = DropDownList::new(source, 12);
        dd.anchor_below(Rect::new(2, 3, 12, 1));
        dd.show();
        dd
    }

    // -- Filtering ----------------------------------------------------------

    #[test]
    fn update_view_filters_by_prefix() {
        let mut dd = list(&["apple", "apricot", "banana"]);
        dd.update_view("ap");
        assert_eq!(dd.items().collect::<Vec<_>>(), vec!["apple", "apricot"]);
        dd.update_view("");
        assert_eq!(dd.len(), 3);
    }

    #[test]
    fn update_view_resets_highlight() {
        let mut dd = list(&["a", "ab", "abc"]);
        assert_eq!(dd.process_key(KeyEvent::plain(KeyCode::Down), true), ListKey::Preview("ab".into()));
        dd.update_view("a");
        assert_eq!(dd.current(), 0);
    }

    // -- Keys ---------------------------------------------------------------

    #[test]
    fn outside_the_list_only_escape_matters() {
        let mut dd = list(&["a"]);
        assert_eq!(dd.process_key(KeyEvent::char('x'), false), ListKey::Ignored);
        assert_eq!(dd.process_key(KeyEvent::plain(KeyCode::Escape), false), ListKey::Consumed);
        assert!(!dd.is_shown());
    }

    #[test]
    fn up_at_top_exits() {
        let mut dd = list(&["a", "b"]);
        assert_eq!(dd.process_key(KeyEvent::plain(KeyCode::Up), true), ListKey::Exit);
        dd.process_key(KeyEvent::plain(KeyCode::Down), true);
        assert_eq!(dd.process_key(KeyEvent::plain(KeyCode::Up), true), ListKey::Preview("a".into()));
    }

    #[test]
    fn down_stops_at_last() {
        let mut dd = list(&["a", "b"]);
        dd.process_key(KeyEvent::plain(KeyCode::Down), true);
        assert_eq!(dd.process_key(KeyEvent::plain(KeyCode::Down), true), ListKey::Consumed);
        assert_eq!(dd.current(), 1);
    }

    #[test]
    fn page_down_scrolls() {
        let mut dd = list(&["a", "b", "c", "d", "e", "f", "g", "h"]);
        assert_eq!(dd.process_key(KeyEvent::plain(KeyCode::PageDown), true), ListKey::Preview("f".into()));
        assert_eq!(dd.top, 1);
        dd.process_key(KeyEvent::plain(KeyCode::PageDown), true);
        assert_eq!(dd.current(), 7);
    }

    #[test]
    fn enter_and_printables_leave() {
        let mut dd = list(&["a"]);
        assert_eq!(dd.process_key(KeyEvent::char('z'), true), ListKey::ExitAndPass);
        assert_eq!(dd.process_key(KeyEvent::plain(KeyCode::Home), true), ListKey::Pass);
        assert_eq!(dd.process_key(KeyEvent::plain(KeyCode::Enter), true), ListKey::ExitAndPass);
        assert!(!dd.is_shown());
    }

    // -- Mouse --------------------------------------------------------------

    #[test]
    fn click_on_item_commits() {
        let mut dd = list(&["apple", "apricot"]);
        // Popup at (2, 4); row 1 holds the second item.
        let click = MouseEvent::new(MouseEventKind::Press(MouseButton::Left), 4, 5);
        assert_eq!(dd.process_mouse_event(click), ListMouse::Commit("apricot".into()));
        assert!(!dd.is_shown());
    }

    #[test]
    fn click_outside_closes() {
        let mut dd = list(&["apple"]);
        let click = MouseEvent::new(MouseEventKind::Press(MouseButton::Left), 40, 20);
        assert_eq!(dd.process_mouse_event(click), ListMouse::Closed);
        assert!(!dd.is_shown());
    }

    // -- Painting -----------------------------------------------------------

    #[test]
    fn paints_box_and_items() {
        let mut dd = list(&["apple", "apricot"]);
        dd.update_contents(&Styles::default(), true);
        assert_eq!(dd.window().row_text(0), "│apple     │");
        assert_eq!(dd.window().row_text(5), "└──────────┘");
    }
}
