//! Framed container that moves focus between its children.
//!
//! A [`Dialog`] owns its children through a [`FocusList`] and paints a box
//! with a title around them. Children are placed relative to the dialog's
//! top-left corner and follow it when it moves.
//!
//! Keys go to the focused child first. What the child leaves alone the
//! dialog interprets: Tab and Shift+Tab step through the children, Alt plus
//! a letter jumps to the child whose hotkey matches, and Escape emits
//! [`Dialog::closed`]. A child that answers with [`EventResult::Focus`]
//! has its move applied here, so a button can ask to skip three siblings
//! with `FocusMove::Backward(3)`.

use std::any::Any;

use tracing::debug;
use tw_term::{KeyCode, KeyEvent, MouseEvent, Rect, Signal, Surface};

use crate::context::Styles;
use crate::focus::FocusList;
use crate::widget::{Container, EventResult, FocusChange, Widget, WidgetBase, WidgetId};

/// A titled, framed container of widgets.
pub struct Dialog {
    base: WidgetBase,
    title: String,
    children: FocusList,
    /// Child offsets relative to the dialog origin.
    offsets: Vec<(WidgetId, u16, u16)>,
    styles: Styles,
    pub closed: Signal<()>,
}

impl Dialog {
    #[must_use]
    pub fn new(title: &str, width: u16, height: u16, styles: Styles) -> Self {
        Self {
            base: WidgetBase::new(width, height),
            title: title.to_owned(),
            children: FocusList::new(),
            offsets: Vec::new(),
            styles,
            closed: Signal::new(),
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Add `widget` at (`col`, `row`) inside the dialog. Traversal order is
    /// insertion order.
    pub fn push_at(&mut self, mut widget: Box<dyn Widget>, col: u16, row: u16) -> WidgetId {
        let origin = self.base.rect();
        widget.set_position(origin.x.saturating_add(col), origin.y.saturating_add(row));
        let id = widget.id();
        self.offsets.push((id, col, row));
        self.children.push(widget);
        id
    }

    #[must_use]
    pub const fn children(&self) -> &FocusList {
        &self.children
    }

    /// Downcast access to a child.
    pub fn child_mut<W: Widget + 'static>(&mut self, id: WidgetId) -> Option<&mut W> {
        self.children
            .get_mut(id)
            .and_then(|w| w.as_any_mut().downcast_mut::<W>())
    }

    #[must_use]
    pub fn focused_child(&self) -> Option<WidgetId> {
        self.children.current_id()
    }

    /// Move focus over `steps` focusable children; negative goes back.
    pub fn focus_steps(&mut self, steps: isize) {
        self.children.focus_steps(steps);
    }

    pub fn focus_next(&mut self) {
        self.children.focus_next();
    }

    pub fn focus_previous(&mut self) {
        self.children.focus_previous();
    }

    /// Place the dialog in the middle of `parent`.
    pub fn center_over(&mut self, parent: Rect) {
        let r = self.base.rect();
        let target = parent.centered(r.w, r.h);
        self.set_position(target.x, target.y);
    }

    fn hotkey_target(&self, ch: char) -> Option<WidgetId> {
        self.children
            .iter()
            .find(|w| w.accepts_focus() && w.is_hotkey(ch))
            .map(Widget::id)
    }

    fn paint_frame(&mut self) {
        let Rect { w, h, .. } = self.base.rect();
        if w < 2 || h < 2 {
            return;
        }
        let style = self.styles.normal;
        let win = &mut self.base.window;
        let inner = usize::from(w - 2);

        win.set_paint(0, 0);
        win.addch('┌', style);
        win.addstr(&"─".repeat(inner), style);
        win.addch('┐', style);
        if !self.title.is_empty() && inner > 2 {
            win.set_paint(0, 2);
            win.addch(' ', style);
            win.addstr(&self.title, style);
            win.addch(' ', style);
            win.set_paint(0, w - 1);
            win.addch('┐', style);
        }
        for row in 1..h - 1 {
            win.set_paint(row, 0);
            win.addch('│', style);
            win.clrtoeol();
            win.set_paint(row, w - 1);
            win.addch('│', style);
        }
        win.set_paint(h - 1, 0);
        win.addch('└', style);
        win.addstr(&"─".repeat(inner), style);
        win.addch('┘', style);
    }
}

impl Widget for Dialog {
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
        if key.code == KeyCode::Tab && key.modifiers_without_shift().is_empty() {
            if key.has_shift() {
                self.children.focus_previous();
            } else {
                self.children.focus_next();
            }
            return EventResult::Consumed;
        }

        if key.has_alt() && !key.has_ctrl() {
            if let KeyCode::Char(ch) = key.code {
                if let Some(id) = self.hotkey_target(ch) {
                    debug!(target: "tw.widgets.focus", ?id, %ch, "hotkey jump");
                    self.children.set_child_focus(id);
                    if let Some(w) = self.children.get_mut(id) {
                        w.hotkey_activated();
                    }
                    return EventResult::Consumed;
                }
            }
        }

        let result = self
            .children
            .current_mut()
            .map_or(EventResult::Ignored, |w| w.process_key(key));
        match result {
            EventResult::Focus(mv) => {
                self.children.apply(mv);
                EventResult::Consumed
            }
            EventResult::Ignored if key.code == KeyCode::Escape && key.modifiers.is_empty() => {
                self.closed.emit(&());
                EventResult::Consumed
            }
            other => other,
        }
    }

    fn process_mouse_event(&mut self, event: MouseEvent) -> bool {
        let Some(index) = self.children.mouse_target(event.x, event.y) else {
            return false;
        };
        let Some(child) = self.children.at_mut(index) else {
            return false;
        };
        let id = child.id();
        let handled = child.process_mouse_event(event);
        if handled && event.is_press(tw_term::MouseButton::Left) {
            self.children.set_child_focus(id);
        }
        handled
    }

    fn set_focus(&mut self, focus: FocusChange) {
        self.children.set_focus(focus);
        self.base.force_redraw();
    }

    fn set_position(&mut self, x: u16, y: u16) {
        self.base.set_position(x, y);
        for child in self.children.iter_mut() {
            let id = child.id();
            if let Some(&(_, col, row)) = self.offsets.iter().find(|(o, ..)| *o == id) {
                child.set_position(x.saturating_add(col), y.saturating_add(row));
            }
        }
    }

    fn show(&mut self) {
        self.base.show();
        self.children.show();
        self.base.force_redraw();
    }

    fn hide(&mut self) {
        self.base.hide();
        self.children.hide();
    }

    fn force_redraw(&mut self) {
        self.base.force_redraw();
        self.children.force_redraw();
    }

    fn update_contents(&mut self) {
        if self.base.take_redraw() {
            self.paint_frame();
        }
        self.children.update_contents();
    }

    fn mouse_grab(&self) -> bool {
        self.children.iter().any(Widget::mouse_grab)
    }

    fn as_container(&self) -> Option<&dyn Container> {
        Some(self)
    }

    fn as_container_mut(&mut self) -> Option<&mut dyn Container> {
        Some(self)
    }
}

impl Container for Dialog {
    fn is_child(&self, id: WidgetId) -> bool {
        self.children.is_child(id)
    }

    fn child_accepts_focus(&self, id: WidgetId) -> bool {
        self.children.child_accepts_focus(id)
    }

    fn point_at(&mut self, id: WidgetId) -> bool {
        self.children.point_at(id)
    }

    fn set_child_focus(&mut self, id: WidgetId) -> bool {
        self.children.set_child_focus(id)
    }
}

impl std::fmt::Debug for Dialog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dialog")
            .field("title", &self.title)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;
    use tw_term::{MouseButton, MouseEventKind};

    use super::*;
    use crate::button::Button;
    use crate::checkbox::Checkbox;
    use crate::context::Context;
    use crate::focus::tests::{Log, Probe};
    use crate::label::Label;
    use crate::split::{Orientation, Split};
    use crate::text_field::TextField;
    use crate::widget::{Direction, FocusMove};

    /// Field, two checkboxes and a Cancel button whose Up returns to the
    /// field.
    fn attribute_dialog() -> (Dialog, [WidgetId; 4]) {
        let styles = Styles::default();
        let mut d = Dialog::new("Attributes", 30, 8, styles);
        let field = d.push_at(Box::new(TextField::new(&Context::default(), 20)), 2, 1);
        let bold = d.push_at(Box::new(Checkbox::new(false, styles)), 2, 2);
        let mut underline = Checkbox::new(false, styles);
        underline.set_label_hotkey(Some('u'));
        let underline = d.push_at(Box::new(underline), 2, 3);
        let mut cancel = Button::new("_Cancel", styles);
        cancel.set_focus_move(Direction::Up, FocusMove::Backward(3));
        let cancel = d.push_at(Box::new(cancel), 2, 5);
        d.show();
        (d, [field, bold, underline, cancel])
    }

    // -- Traversal ----------------------------------------------------------

    #[test]
    fn tab_cycles_and_shift_tab_reverses() {
        let (mut d, ids) = attribute_dialog();
        assert_eq!(d.focused_child(), Some(ids[0]));
        d.process_key(KeyEvent::plain(KeyCode::Tab));
        assert_eq!(d.focused_child(), Some(ids[1]));
        d.process_key(KeyEvent::plain(KeyCode::Tab).shift());
        d.process_key(KeyEvent::plain(KeyCode::Tab).shift());
        assert_eq!(d.focused_child(), Some(ids[3]));
    }

    #[test]
    fn button_up_skips_three() {
        let (mut d, ids) = attribute_dialog();
        d.focus_steps(3);
        assert_eq!(d.focused_child(), Some(ids[3]));
        assert_eq!(d.process_key(KeyEvent::plain(KeyCode::Up)), EventResult::Consumed);
        assert_eq!(d.focused_child(), Some(ids[0]));
    }

    #[test]
    fn field_down_moves_to_next_child() {
        let (mut d, ids) = attribute_dialog();
        d.process_key(KeyEvent::plain(KeyCode::Down));
        assert_eq!(d.focused_child(), Some(ids[1]));
    }

    #[test]
    fn disabled_children_are_skipped() {
        let (mut d, ids) = attribute_dialog();
        if let Some(w) = d.children.get_mut(ids[1]) {
            w.set_enabled(false);
        }
        d.focus_next();
        assert_eq!(d.focused_child(), Some(ids[2]));
    }

    // -- Hotkeys and signals ------------------------------------------------

    #[test]
    fn alt_hotkey_focuses_and_activates() {
        let (mut d, ids) = attribute_dialog();
        d.process_key(KeyEvent::char('u').alt());
        assert_eq!(d.focused_child(), Some(ids[2]));
        assert!(d.child_mut::<Checkbox>(ids[2]).unwrap().state());

        let fired = Rc::new(Cell::new(false));
        let f = Rc::clone(&fired);
        d.child_mut::<Button>(ids[3]).unwrap().activate.connect(move |_| f.set(true));
        d.process_key(KeyEvent::char('C').alt());
        assert_eq!(d.focused_child(), Some(ids[3]));
        assert!(fired.get());
    }

    #[test]
    fn escape_emits_closed() {
        let (mut d, _) = attribute_dialog();
        let closed = Rc::new(Cell::new(0));
        let c = Rc::clone(&closed);
        d.closed.connect(move |_| c.set(c.get() + 1));
        d.process_key(KeyEvent::plain(KeyCode::Escape));
        assert_eq!(closed.get(), 1);
    }

    // -- Nested targets -----------------------------------------------------

    #[test]
    fn explicit_focus_reaches_into_nested_containers() {
        let log = Log::default();
        let styles = Styles::default();
        let mut d = Dialog::new("Panes", 30, 10, styles);
        let field = Probe::new(&log, true);
        let field_id = field.id();
        d.push_at(field, 1, 1);

        let a = Probe::new(&log, true);
        let a_id = a.id();
        let b = Probe::new(&log, false);
        let b_id = b.id();
        let mut split = Split::new(a);
        split.split(b, Orientation::Vertical);
        let split_id = d.push_at(Box::new(split), 1, 2);

        let mut inner = Dialog::new("Inner", 12, 4, styles);
        let q = Probe::new(&log, true);
        inner.push_at(q, 1, 1);
        let r = Probe::new(&log, true);
        let r_id = r.id();
        inner.push_at(r, 1, 2);
        inner.show();
        let inner_id = d.push_at(Box::new(inner), 1, 5);

        d.show();
        d.set_focus(FocusChange::Set);
        log.borrow_mut().clear();

        assert!(!d.set_child_focus(b_id));
        assert_eq!(d.focused_child(), Some(field_id));
        assert!(log.borrow().is_empty());

        assert!(d.set_child_focus(a_id));
        assert_eq!(d.focused_child(), Some(split_id));
        assert_eq!(
            *log.borrow(),
            vec![(field_id, FocusChange::Out), (a_id, FocusChange::Set)]
        );

        log.borrow_mut().clear();
        assert!(d.set_child_focus(r_id));
        assert_eq!(d.focused_child(), Some(inner_id));
        assert_eq!(
            *log.borrow(),
            vec![(a_id, FocusChange::Out), (r_id, FocusChange::Set)]
        );
    }

    // -- Mouse and geometry -------------------------------------------------

    #[test]
    fn click_focuses_child() {
        let (mut d, ids) = attribute_dialog();
        let click = MouseEvent::new(MouseEventKind::Press(MouseButton::Left), 3, 3);
        assert!(d.process_mouse_event(click));
        assert_eq!(d.focused_child(), Some(ids[2]));
    }

    #[test]
    fn children_follow_dialog() {
        let (mut d, ids) = attribute_dialog();
        d.center_over(Rect::new(0, 0, 80, 24));
        assert_eq!(d.rect(), Rect::new(25, 8, 30, 8));
        let cancel = d.children().get(ids[3]).unwrap().rect();
        assert_eq!((cancel.x, cancel.y), (27, 13));
    }

    #[test]
    fn frame_carries_title() {
        let mut d = Dialog::new("Hi", 8, 3, Styles::default());
        d.update_contents();
        assert_eq!(d.window().row_text(0), "┌─ Hi ─┐");
        assert_eq!(d.window().row_text(1), "│      │");
        assert_eq!(d.window().row_text(2), "└──────┘");
    }

    // -- Placeholder --------------------------------------------------------

    #[test]
    fn labels_only_dialog_parks_on_placeholder() {
        let mut d = Dialog::new("Info", 20, 4, Styles::default());
        let label = d.push_at(Box::new(Label::new("Nothing to do", Styles::default())), 1, 1);
        d.show();
        assert!(d.children().has_placeholder());
        assert_ne!(d.focused_child(), Some(label));
        d.focus_next();
        assert!(d.children().has_placeholder());
        d.hide();
        assert!(!d.children().has_placeholder());
    }
}
