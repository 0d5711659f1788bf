//! The root context handed to widgets at construction.
//!
//! One [`Context`] is built at application start (see the facade crate's
//! `Toolkit`) and cloned into every widget that needs shared state: the
//! clipboard, the key bindings and the editing settings. Clones share the
//! clipboard store and the bindings table.

use std::rc::Rc;

use tw_term::{Attr, Style};
use tw_text::Clipboard;

use crate::key_binding::KeyBindings;

/// Editing preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Tab stop width for multi-line text.
    pub tabsize: usize,
    /// Indent with spaces instead of a tab.
    pub tab_spaces: bool,
    /// Undo entries kept per buffer; 0 keeps all.
    pub undo_limit: usize,
    /// Select the whole text when a field gains focus.
    pub select_on_focus: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tabsize: 8,
            tab_spaces: false,
            undo_limit: 1000,
            select_on_focus: true,
        }
    }
}

/// Styles widgets paint with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Styles {
    pub normal: Style,
    /// Layered over `normal` for selected text.
    pub selected: Style,
    /// Layered over `normal` for the focused button or list item.
    pub focused: Style,
    /// Layered over `normal` for a hotkey letter.
    pub hotkey: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            normal: Style::PLAIN,
            selected: Style::attr(Attr::REVERSE),
            focused: Style::attr(Attr::REVERSE),
            hotkey: Style::attr(Attr::UNDERLINE),
        }
    }
}

/// Shared state for a widget tree.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub clipboard: Clipboard,
    pub bindings: Rc<KeyBindings>,
    pub settings: Settings,
    pub styles: Styles,
}

impl Context {
    #[must_use]
    pub fn new(settings: Settings, bindings: KeyBindings) -> Self {
        Self {
            clipboard: Clipboard::new(),
            bindings: Rc::new(bindings),
            settings,
            styles: Styles::default(),
        }
    }

    /// The same context with a different clipboard (e.g. one mirrored to
    /// the system).
    #[must_use]
    pub fn with_clipboard(mut self, clipboard: Clipboard) -> Self {
        self.clipboard = clipboard;
        self
    }
}
