//! Clipboard and primary selection.
//!
//! Two slots: the **clipboard** (explicit cut/copy/paste) and the
//! **primary** selection (whatever was last selected with the mouse or
//! keyboard, pasted with middle click or shift+insert). Either may be empty.
//!
//! [`Clipboard`] is a cheap-to-clone handle onto one shared store. The root
//! context creates it once and hands clones to every widget, so cut in one
//! field and paste in another see the same text.
//!
//! # Locking
//!
//! An optional [`ClipboardBackend`] mirrors the slots to the outside world
//! (a system clipboard, a test recorder). Access goes through a scoped
//! [`ClipboardLock`]: the outermost lock pulls fresh contents from the
//! backend, changes made while any lock is held stay local, and releasing
//! the outermost lock pushes the changed slots back. A paste that fetches,
//! filters and clears therefore sees one consistent state even when a
//! callback it triggers touches the clipboard again. Locks are reentrant.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

/// Which slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardKind {
    Clipboard,
    Primary,
}

impl ClipboardKind {
    const fn index(self) -> usize {
        match self {
            Self::Clipboard => 0,
            Self::Primary => 1,
        }
    }

    const ALL: [Self; 2] = [Self::Clipboard, Self::Primary];
}

/// External mirror of the clipboard slots.
pub trait ClipboardBackend {
    /// Publish `text` (or clear the slot with `None`).
    fn store(&mut self, kind: ClipboardKind, text: Option<&str>);
    /// Current external contents.
    fn load(&mut self, kind: ClipboardKind) -> Option<String>;
}

#[derive(Default)]
struct Slot {
    content: Option<String>,
    dirty: bool,
}

#[derive(Default)]
struct Store {
    slots: [Slot; 2],
    depth: usize,
    backend: Option<Box<dyn ClipboardBackend>>,
}

// ---------------------------------------------------------------------------
// Clipboard
// ---------------------------------------------------------------------------

/// Shared handle onto the clipboard store.
#[derive(Clone, Default)]
pub struct Clipboard {
    store: Rc<RefCell<Store>>,
}

impl Clipboard {
    /// A process-local clipboard with no backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard mirrored through `backend`.
    #[must_use]
    pub fn with_backend(backend: impl ClipboardBackend + 'static) -> Self {
        let clipboard = Self::new();
        clipboard.store.borrow_mut().backend = Some(Box::new(backend));
        clipboard
    }

    /// Acquire the scoped lock. Reentrant.
    #[must_use = "the lock is released when the guard is dropped"]
    pub fn lock(&self) -> ClipboardLock {
        let mut store = self.store.borrow_mut();
        store.depth += 1;
        if store.depth == 1 {
            let Store { slots, backend, .. } = &mut *store;
            if let Some(backend) = backend {
                for kind in ClipboardKind::ALL {
                    slots[kind.index()] = Slot {
                        content: backend.load(kind),
                        dirty: false,
                    };
                }
            }
        }
        ClipboardLock {
            store: Rc::clone(&self.store),
        }
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.store.borrow().depth > 0
    }

    /// Contents of a slot.
    #[must_use]
    pub fn get(&self, kind: ClipboardKind) -> Option<String> {
        let _lock = self.lock();
        self.store.borrow().slots[kind.index()].content.clone()
    }

    /// Replace a slot. `None` clears it.
    pub fn set(&self, kind: ClipboardKind, text: Option<String>) {
        let _lock = self.lock();
        trace!(target: "tw.text.clipboard", ?kind, len = text.as_ref().map(String::len), "set");
        let slot = &mut self.store.borrow_mut().slots[kind.index()];
        slot.content = text;
        slot.dirty = true;
    }

    #[must_use]
    pub fn get_clipboard(&self) -> Option<String> {
        self.get(ClipboardKind::Clipboard)
    }

    pub fn set_clipboard(&self, text: Option<String>) {
        self.set(ClipboardKind::Clipboard, text);
    }

    #[must_use]
    pub fn get_primary(&self) -> Option<String> {
        self.get(ClipboardKind::Primary)
    }

    pub fn set_primary(&self, text: Option<String>) {
        self.set(ClipboardKind::Primary, text);
    }
}

impl fmt::Debug for Clipboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.store.borrow();
        f.debug_struct("Clipboard")
            .field("depth", &store.depth)
            .field("backend", &store.backend.is_some())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Lock guard
// ---------------------------------------------------------------------------

/// Scope guard returned by [`Clipboard::lock`].
pub struct ClipboardLock {
    store: Rc<RefCell<Store>>,
}

impl Drop for ClipboardLock {
    fn drop(&mut self) {
        let mut store = self.store.borrow_mut();
        store.depth = store.depth.saturating_sub(1);
        if store.depth > 0 {
            return;
        }
        let Store { slots, backend, .. } = &mut *store;
        for kind in ClipboardKind::ALL {
            let slot = &mut slots[kind.index()];
            if !slot.dirty {
                continue;
            }
            slot.dirty = false;
            if let Some(backend) = backend {
                backend.store(kind, slot.content.as_deref());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct Recorder {
        stored: Rc<RefCell<Vec<(ClipboardKind, Option<String>)>>>,
        external: Rc<RefCell<Option<String>>>,
    }

    impl ClipboardBackend for Recorder {
        fn store(&mut self, kind: ClipboardKind, text: Option<&str>) {
            self.stored.borrow_mut().push((kind, text.map(String::from)));
            if kind == ClipboardKind::Clipboard {
                *self.external.borrow_mut() = text.map(String::from);
            }
        }

        fn load(&mut self, kind: ClipboardKind) -> Option<String> {
            match kind {
                ClipboardKind::Clipboard => self.external.borrow().clone(),
                ClipboardKind::Primary => None,
            }
        }
    }

    #[test]
    fn handles_share_one_store() {
        let a = Clipboard::new();
        let b = a.clone();
        a.set_clipboard(Some("hello".into()));
        assert_eq!(b.get_clipboard().as_deref(), Some("hello"));
        assert_eq!(b.get_primary(), None);
    }

    #[test]
    fn slots_are_independent() {
        let cb = Clipboard::new();
        cb.set_primary(Some("sel".into()));
        cb.set_clipboard(Some("clip".into()));
        cb.set_primary(None);
        assert_eq!(cb.get_clipboard().as_deref(), Some("clip"));
        assert_eq!(cb.get_primary(), None);
    }

    #[test]
    fn lock_is_reentrant_and_scoped() {
        let cb = Clipboard::new();
        assert!(!cb.is_locked());
        {
            let _outer = cb.lock();
            let _inner = cb.lock();
            assert!(cb.is_locked());
        }
        assert!(!cb.is_locked());
    }

    #[test]
    fn backend_sees_changes_on_outermost_release() {
        let rec = Recorder::default();
        let cb = Clipboard::with_backend(rec.clone());
        {
            let _lock = cb.lock();
            cb.set_clipboard(Some("one".into()));
            cb.set_clipboard(Some("two".into()));
            assert!(rec.stored.borrow().is_empty());
        }
        assert_eq!(
            *rec.stored.borrow(),
            vec![(ClipboardKind::Clipboard, Some("two".to_string()))]
        );
    }

    #[test]
    fn outermost_lock_pulls_from_backend() {
        let rec = Recorder::default();
        let cb = Clipboard::with_backend(rec.clone());
        *rec.external.borrow_mut() = Some("external".into());
        assert_eq!(cb.get_clipboard().as_deref(), Some("external"));
    }
}
