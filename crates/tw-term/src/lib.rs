// SPDX-License-Identifier: MIT
//
// tw-term: the drawing and input boundary of the twidget toolkit.
//
// Everything a widget needs from "the terminal" without touching one:
// structured key and mouse events, click counting, styled cells, an
// in-memory `Window` behind the `Surface` painting trait, display-width
// helpers, and `Signal<T>` for widget notifications.
//
// A terminal backend feeds events in and composes shown windows out. That
// backend lives outside this crate; tests drive widgets directly.

pub mod cell;
pub mod input;
pub mod signal;
pub mod window;

pub use cell::{Attr, Cell, Style};
pub use input::{
    ClickTracker, Event, KeyCode, KeyEvent, KeyEventKind, KeySpecError, Modifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
pub use signal::{Connection, Signal};
pub use window::{Rect, Surface, Window, char_width, string_width};
