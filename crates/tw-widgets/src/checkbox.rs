//! Two-state checkbox.

use std::any::Any;

use tw_term::{KeyCode, KeyEvent, MouseButton, MouseEvent, Signal, Surface};

use crate::context::Styles;
use crate::widget::{ArrowMoves, Direction, EventResult, FocusChange, FocusMove, Widget, WidgetBase};

/// `[X]` / `[ ]`, drawn `[-]` while disabled.
pub struct Checkbox {
    base: WidgetBase,
    state: bool,
    focus: bool,
    hotkey: Option<char>,
    moves: ArrowMoves,
    styles: Styles,
    /// The state changed; carries the new state.
    pub toggled: Signal<bool>,
    /// Enter was pressed.
    pub activate: Signal<()>,
}

impl Checkbox {
    #[must_use]
    pub fn new(state: bool, styles: Styles) -> Self {
        Self {
            base: WidgetBase::new(3, 1),
            state,
            focus: false,
            hotkey: None,
            moves: ArrowMoves::default(),
            styles,
            toggled: Signal::new(),
            activate: Signal::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> bool {
        self.state
    }

    /// Set the state without emitting `toggled`.
    pub const fn set_state(&mut self, state: bool) {
        self.state = state;
        self.base.force_redraw();
    }

    pub const fn set_label_hotkey(&mut self, hotkey: Option<char>) {
        self.hotkey = hotkey;
    }

    pub const fn set_focus_move(&mut self, dir: Direction, mv: FocusMove) {
        self.moves.set(dir, mv);
    }

    fn toggle(&mut self) {
        self.state = !self.state;
        self.base.force_redraw();
        self.toggled.emit(&self.state);
    }
}

impl Widget for Checkbox {
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
        if let Some(dir) = Direction::of_key(&key) {
            return EventResult::Focus(self.moves.get(dir));
        }
        if !key.modifiers.is_empty() {
            return EventResult::Ignored;
        }
        match key.code {
            KeyCode::Char(' ') => self.toggle(),
            KeyCode::Enter => self.activate.emit(&()),
            _ => return EventResult::Ignored,
        }
        EventResult::Consumed
    }

    fn process_mouse_event(&mut self, event: MouseEvent) -> bool {
        if self.is_enabled() && event.is_press(MouseButton::Left) {
            self.toggle();
            return true;
        }
        false
    }

    fn set_focus(&mut self, focus: FocusChange) {
        self.focus = focus.is_in();
        self.base.force_redraw();
    }

    fn update_contents(&mut self) {
        if !self.base.take_redraw() {
            return;
        }
        let mark = match (self.base.is_enabled(), self.state) {
            (false, _) => '-',
            (true, true) => 'X',
            (true, false) => ' ',
        };
        let normal = self.styles.normal;
        let mark_style = if self.focus {
            normal.combine(self.styles.focused)
        } else {
            normal
        };
        let win = &mut self.base.window;
        win.set_paint(0, 0);
        win.addch('[', normal);
        win.addch(mark, mark_style);
        win.addch(']', normal);
    }

    fn is_hotkey(&self, ch: char) -> bool {
        self.hotkey
            .is_some_and(|h| h.to_lowercase().eq(ch.to_lowercase()))
    }

    fn hotkey_activated(&mut self) {
        self.toggle();
    }
}

impl std::fmt::Debug for Checkbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checkbox")
            .field("state", &self.state)
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use tw_term::MouseEventKind;

    use super::*;

    #[test]
    fn space_toggles_and_reports() {
        let mut c = Checkbox::new(false, Styles::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        c.toggled.connect(move |s| log.borrow_mut().push(*s));
        c.process_key(KeyEvent::char(' '));
        c.process_key(KeyEvent::char(' '));
        assert_eq!(*seen.borrow(), vec![true, false]);
        assert!(!c.state());
    }

    #[test]
    fn paints_state() {
        let mut c = Checkbox::new(true, Styles::default());
        c.update_contents();
        assert_eq!(c.window().row_text(0), "[X]");
        c.set_state(false);
        c.update_contents();
        assert_eq!(c.window().row_text(0), "[ ]");
        c.set_enabled(false);
        c.update_contents();
        assert_eq!(c.window().row_text(0), "[-]");
        assert!(!c.accepts_focus());
    }

    #[test]
    fn click_and_hotkey_toggle() {
        let mut c = Checkbox::new(false, Styles::default());
        c.set_label_hotkey(Some('b'));
        let click = MouseEvent::new(MouseEventKind::Press(MouseButton::Left), 1, 0);
        assert!(c.process_mouse_event(click));
        assert!(c.state());
        assert!(c.is_hotkey('B'));
        c.hotkey_activated();
        assert!(!c.state());
    }

    #[test]
    fn arrows_move_focus() {
        let mut c = Checkbox::new(false, Styles::default());
        assert_eq!(
            c.process_key(KeyEvent::plain(KeyCode::Down)),
            EventResult::Focus(FocusMove::Forward(1))
        );
    }
}
