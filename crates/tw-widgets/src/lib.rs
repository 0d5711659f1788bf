//! # tw-widgets: Widgets for twidget
//!
//! Interactive controls built on the `tw-term` window primitive and the
//! `tw-text` editing engine:
//!
//! - **[`widget`]**: the `Widget` and `Container` traits, focus moves
//! - **[`context`]**: the shared `Context`: clipboard, bindings, settings
//! - **[`key_binding`]**: rebindable editing actions
//! - **[`focus`]**: `FocusList`, ordered traversal with a placeholder
//! - **[`dialog`]**: a framed container with Tab / hotkey navigation
//! - **[`split`]**: the split-pane tree
//! - **[`text_field`]**: single-line entry with autocompletion
//! - **[`drop_down`]** and **[`completion`]**: the completion popup and
//!   its prefix filter
//! - **[`text_view`]**: multi-line editing over a `TextBuffer`
//! - **[`button`]**, **[`checkbox`]**, **[`label`]**: simple controls

pub mod button;
pub mod checkbox;
pub mod completion;
pub mod context;
pub mod dialog;
pub mod drop_down;
pub mod focus;
pub mod key_binding;
pub mod label;
pub mod split;
pub mod text_field;
pub mod text_view;
pub mod widget;

pub use button::Button;
pub use checkbox::Checkbox;
pub use completion::{FilteredList, StringList};
pub use context::{Context, Settings, Styles};
pub use dialog::Dialog;
pub use drop_down::DropDownList;
pub use focus::FocusList;
pub use key_binding::{Action, KeyBindings};
pub use label::{HotkeyText, Label};
pub use split::{Orientation, Pane, Split};
pub use text_field::TextField;
pub use text_view::TextView;
pub use widget::{
    ArrowMoves, Container, Direction, EventResult, FocusChange, FocusMove, Placeholder, Widget,
    WidgetBase, WidgetId,
};
