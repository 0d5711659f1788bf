// SPDX-License-Identifier: MIT
//
// Signal: typed callback lists for widget notifications.
//
// Widgets expose their notifications (`activate`, `toggled`, `closed`, ...)
// as public `Signal<T>` fields. Application code connects closures; the
// widget emits a payload and every connected closure runs, in connection
// order, synchronously.

use std::fmt;

/// Handle returned by [`Signal::connect`], used to disconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection(u64);

type Slot<T> = Box<dyn FnMut(&T)>;

/// A list of callbacks receiving `&T`.
pub struct Signal<T> {
    slots: Vec<(Connection, Slot<T>)>,
    next_id: u64,
}

impl<T> Signal<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 0,
        }
    }

    /// Register `f`. It runs on every subsequent `emit`.
    pub fn connect(&mut self, f: impl FnMut(&T) + 'static) -> Connection {
        let conn = Connection(self.next_id);
        self.next_id += 1;
        self.slots.push((conn, Box::new(f)));
        conn
    }

    /// Remove a callback. Returns `false` if it was not connected.
    pub fn disconnect(&mut self, conn: Connection) -> bool {
        let before = self.slots.len();
        self.slots.retain(|(c, _)| *c != conn);
        self.slots.len() != before
    }

    /// Invoke every callback with `value`.
    pub fn emit(&mut self, value: &T) {
        for (_, slot) in &mut self.slots {
            slot(value);
        }
    }

    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        !self.slots.is_empty()
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signal({} slots)", self.slots.len())
    }
}
