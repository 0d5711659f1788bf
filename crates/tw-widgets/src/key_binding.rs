//! Named editing actions and the keys bound to them.
//!
//! Navigation and plain editing keys are fixed; the clipboard, selection
//! and undo commands go through a [`KeyBindings`] table so applications
//! (and the config file) can rebind them.

use std::collections::HashMap;
use std::fmt;

use tw_term::{KeyCode, KeyEvent, KeySpecError, Modifiers};

/// A rebindable editing command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Cut,
    Copy,
    Paste,
    /// Paste the primary selection.
    PasteSelection,
    /// Toggle mark mode.
    MarkSelection,
    /// Ask the application for a character to insert.
    InsertSpecial,
    SelectAll,
    Undo,
    Redo,
}

impl Action {
    pub const ALL: [Self; 9] = [
        Self::Cut,
        Self::Copy,
        Self::Paste,
        Self::PasteSelection,
        Self::MarkSelection,
        Self::InsertSpecial,
        Self::SelectAll,
        Self::Undo,
        Self::Redo,
    ];

    /// Config-file name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cut => "cut",
            Self::Copy => "copy",
            Self::Paste => "paste",
            Self::PasteSelection => "paste_selection",
            Self::MarkSelection => "mark_selection",
            Self::InsertSpecial => "insert_special",
            Self::SelectAll => "select_all",
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    const fn default_keys(self) -> &'static [&'static str] {
        match self {
            Self::Cut => &["ctrl+x", "shift+delete"],
            Self::Copy => &["ctrl+c", "ctrl+insert"],
            Self::Paste => &["ctrl+v"],
            Self::PasteSelection => &["shift+insert"],
            Self::MarkSelection => &["ctrl+space"],
            Self::InsertSpecial => &["ctrl+q"],
            Self::SelectAll => &["ctrl+a"],
            Self::Undo => &["ctrl+z"],
            Self::Redo => &["ctrl+y"],
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Key to action lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    map: HashMap<(KeyCode, Modifiers), Action>,
}

impl KeyBindings {
    /// No bindings at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// The stock bindings (`ctrl+x` cut, `ctrl+c` copy, ...).
    #[must_use]
    pub fn defaults() -> Self {
        let mut bindings = Self::empty();
        for action in Action::ALL {
            for spec in action.default_keys() {
                if let Ok(key) = KeyEvent::parse(spec) {
                    bindings.bind(key, action);
                }
            }
        }
        bindings
    }

    /// Bind `key` to `action`, replacing whatever `key` did before.
    pub fn bind(&mut self, key: KeyEvent, action: Action) {
        self.map.insert((key.code, key.modifiers), action);
    }

    /// Replace every key of `action` with the keys described by `specs`.
    ///
    /// # Errors
    ///
    /// Returns the first unparsable description; the table is unchanged
    /// in that case.
    pub fn rebind(&mut self, action: Action, specs: &[&str]) -> Result<(), KeySpecError> {
        let keys = specs
            .iter()
            .map(|s| KeyEvent::parse(s))
            .collect::<Result<Vec<_>, _>>()?;
        self.map.retain(|_, a| *a != action);
        for key in keys {
            self.bind(key, action);
        }
        Ok(())
    }

    #[must_use]
    pub fn find_action(&self, key: &KeyEvent) -> Option<Action> {
        self.map.get(&(key.code, key.modifiers)).copied()
    }

    /// Keys bound to `action`, in display form, sorted.
    #[must_use]
    pub fn keys_for(&self, action: Action) -> Vec<String> {
        let mut keys: Vec<String> = self
            .map
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((code, modifiers), _)| KeyEvent::new(*code, *modifiers).to_string())
            .collect();
        keys.sort();
        keys
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::defaults()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_cover_every_action() {
        let b = KeyBindings::defaults();
        for action in Action::ALL {
            assert!(!b.keys_for(action).is_empty(), "{action} unbound");
        }
        assert_eq!(
            b.find_action(&KeyEvent::char('x').ctrl()),
            Some(Action::Cut)
        );
        assert_eq!(
            b.find_action(&KeyEvent::plain(KeyCode::Insert).shift()),
            Some(Action::PasteSelection)
        );
        assert_eq!(b.find_action(&KeyEvent::char('x')), None);
    }

    #[test]
    fn rebind_replaces_keys() {
        let mut b = KeyBindings::defaults();
        b.rebind(Action::Copy, &["alt+w"]).unwrap();
        assert_eq!(b.keys_for(Action::Copy), vec!["alt+w".to_string()]);
        assert_eq!(b.find_action(&KeyEvent::char('c').ctrl()), None);
        assert_eq!(b.find_action(&KeyEvent::char('w').alt()), Some(Action::Copy));
    }

    #[test]
    fn rebind_error_leaves_table_alone() {
        let mut b = KeyBindings::defaults();
        assert!(b.rebind(Action::Undo, &["ctrl+z", "hyper+u"]).is_err());
        assert_eq!(b.find_action(&KeyEvent::char('z').ctrl()), Some(Action::Undo));
    }

    #[test]
    fn names_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::from_name(action.name()), Some(action));
        }
        assert_eq!(Action::from_name("explode"), None);
    }
}
