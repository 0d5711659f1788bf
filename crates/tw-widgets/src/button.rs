//! Push button.

use std::any::Any;

use tw_term::{KeyCode, KeyEvent, MouseButton, MouseEvent, Signal, Surface};

use crate::context::Styles;
use crate::label::HotkeyText;
use crate::widget::{ArrowMoves, Direction, EventResult, FocusChange, FocusMove, Widget, WidgetBase};

/// A `[ Label ]` button. Enter, Space, a click or the hotkey fire
/// [`activate`](Self::activate).
pub struct Button {
    base: WidgetBase,
    label: HotkeyText,
    focus: bool,
    moves: ArrowMoves,
    styles: Styles,
    pub activate: Signal<()>,
}

impl Button {
    #[must_use]
    pub fn new(label: &str, styles: Styles) -> Self {
        let label = HotkeyText::parse(label);
        let width = u16::try_from(label.width() + 4).unwrap_or(u16::MAX);
        Self {
            base: WidgetBase::new(width, 1),
            label,
            focus: false,
            moves: ArrowMoves::default(),
            styles,
            activate: Signal::new(),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        self.label.text()
    }

    /// What the arrow key `dir` asks the enclosing container to do.
    pub const fn set_focus_move(&mut self, dir: Direction, mv: FocusMove) {
        self.moves.set(dir, mv);
    }

    #[must_use]
    pub const fn has_focus(&self) -> bool {
        self.focus
    }
}

impl Widget for Button {
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
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') if key.modifiers.is_empty() => {
                self.activate.emit(&());
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    fn process_mouse_event(&mut self, event: MouseEvent) -> bool {
        if event.is_press(MouseButton::Left) {
            self.activate.emit(&());
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
        let style = if self.focus {
            self.styles.normal.combine(self.styles.focused)
        } else {
            self.styles.normal
        };
        let win = &mut self.base.window;
        win.set_paint(0, 0);
        win.clrtoeol();
        win.addstr("[ ", style);
        self.label.paint(win, style, &self.styles);
        win.addstr(" ]", style);
    }

    fn is_hotkey(&self, ch: char) -> bool {
        self.label.matches(ch)
    }

    fn hotkey_activated(&mut self) {
        self.activate.emit(&());
    }
}

impl std::fmt::Debug for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Button")
            .field("label", &self.label.text())
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
