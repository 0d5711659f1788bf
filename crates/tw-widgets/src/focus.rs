//! Ordered focus traversal over a list of child widgets.
//!
//! [`FocusList`] is the shared core of every container with a "current"
//! child: it owns the children, keeps `current` on a widget that accepts
//! focus, and performs the OUT / IN transitions when focus moves.
//!
//! When no child accepts focus, [`FocusList::show`] parks focus on an
//! invisible [`Placeholder`] at the front of the list so `current` is
//! always a valid index. The placeholder goes away on the next
//! [`push`](FocusList::push) or [`hide`](FocusList::hide).

use tracing::debug;

use crate::widget::{FocusChange, FocusMove, Placeholder, Widget, WidgetId};

/// Children plus the index of the focused one.
#[derive(Default)]
pub struct FocusList {
    widgets: Vec<Box<dyn Widget>>,
    current: usize,
    placeholder: bool,
}

impl FocusList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child. Drops the placeholder if it is parked in front.
    pub fn push(&mut self, widget: Box<dyn Widget>) {
        if self.placeholder {
            self.widgets.remove(0);
            self.placeholder = false;
            self.current = 0;
        }
        self.widgets.push(widget);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Widget> {
        self.widgets.iter().map(|w| &**w)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Widget>> {
        self.widgets.iter_mut()
    }

    /// The focused child.
    #[must_use]
    pub fn current(&self) -> Option<&dyn Widget> {
        self.widgets.get(self.current).map(|w| &**w)
    }

    pub fn current_mut(&mut self) -> Option<&mut Box<dyn Widget>> {
        self.widgets.get_mut(self.current)
    }

    #[must_use]
    pub fn current_id(&self) -> Option<WidgetId> {
        self.current().map(Widget::id)
    }

    #[must_use]
    pub const fn has_placeholder(&self) -> bool {
        self.placeholder
    }

    /// The direct child `id`.
    #[must_use]
    pub fn get(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.iter().find(|w| w.id() == id)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut Box<dyn Widget>> {
        self.widgets.iter_mut().find(|w| w.id() == id)
    }

    /// Point `current` at the first focusable child, parking focus on the
    /// placeholder when there is none.
    pub fn show(&mut self) {
        match self.widgets.iter().position(|w| w.accepts_focus()) {
            Some(i) => self.current = i,
            None if !self.placeholder => {
                debug!(target: "tw.widgets.focus", "no focusable child, parking on placeholder");
                self.widgets.insert(0, Box::new(Placeholder::new()));
                self.placeholder = true;
                self.current = 0;
            }
            None => self.current = 0,
        }
    }

    /// Drop the placeholder, if any.
    pub fn hide(&mut self) {
        if self.placeholder {
            self.widgets.remove(0);
            self.placeholder = false;
            self.current = self.current.saturating_sub(1);
        }
    }

    /// Pass `focus` to the current child.
    pub fn set_focus(&mut self, focus: FocusChange) {
        if let Some(w) = self.current_mut() {
            w.set_focus(focus);
        }
    }

    pub fn focus_next(&mut self) {
        self.focus_steps(1);
    }

    pub fn focus_previous(&mut self) {
        self.focus_steps(-1);
    }

    pub fn apply(&mut self, mv: FocusMove) {
        self.focus_steps(mv.steps());
    }

    /// Move focus over `steps` focusable children, forward when positive,
    /// wrapping around. Non-focusable children are skipped and do not
    /// count. Only the start and end widgets see focus transitions.
    pub fn focus_steps(&mut self, steps: isize) {
        let n = self.widgets.len();
        if n == 0 || steps == 0 {
            return;
        }
        let forward = steps > 0;
        let mut target = self.current;
        for _ in 0..steps.unsigned_abs() {
            let Some(next) = self.step_from(target, forward) else {
                return;
            };
            target = next;
        }

        self.widgets[self.current].set_focus(FocusChange::Out);
        self.current = target;
        let change = if forward {
            FocusChange::InForward
        } else {
            FocusChange::InBackward
        };
        debug!(target: "tw.widgets.focus", index = target, steps, "focus moved");
        self.widgets[target].set_focus(change);
    }

    /// The next focusable index after `from` in the given direction, or
    /// `None` when nothing accepts focus.
    fn step_from(&self, from: usize, forward: bool) -> Option<usize> {
        let n = self.widgets.len();
        (1..=n)
            .map(|k| if forward { (from + k) % n } else { (from + n - k % n) % n })
            .find(|&i| self.widgets[i].accepts_focus())
    }

    /// Whether `id` is a child or a descendant of a child container.
    #[must_use]
    pub fn is_child(&self, id: WidgetId) -> bool {
        self.widgets.iter().any(|w| {
            w.id() == id || w.as_container().is_some_and(|c| c.is_child(id))
        })
    }

    /// Whether `id` is in the tree and would take focus.
    #[must_use]
    pub fn child_accepts_focus(&self, id: WidgetId) -> bool {
        self.widgets.iter().any(|w| {
            if w.id() == id {
                w.accepts_focus()
            } else {
                w.as_container().is_some_and(|c| c.child_accepts_focus(id))
            }
        })
    }

    /// Index of the child that is `id` or contains it.
    fn branch_of(&self, id: WidgetId) -> Option<usize> {
        self.widgets.iter().position(|w| {
            w.id() == id || w.as_container().is_some_and(|c| c.is_child(id))
        })
    }

    /// Point `current` at the branch holding `id`, and that branch at `id`,
    /// without focus transitions.
    pub fn point_at(&mut self, id: WidgetId) -> bool {
        let Some(i) = self.branch_of(id) else {
            return false;
        };
        if self.widgets[i].id() != id
            && !self.widgets[i].as_container_mut().is_some_and(|c| c.point_at(id))
        {
            return false;
        }
        self.current = i;
        true
    }

    /// Move focus to the descendant `id`.
    ///
    /// Nothing changes unless `id` exists and accepts focus. Otherwise the
    /// old child gets `Out` and the branch holding `id` gets `Set`, which
    /// a container passes down to `id`. A target inside the current
    /// branch is left to that container to route.
    pub fn set_child_focus(&mut self, id: WidgetId) -> bool {
        if !self.child_accepts_focus(id) {
            return false;
        }
        let Some(i) = self.branch_of(id) else {
            return false;
        };
        let direct = self.widgets[i].id() == id;
        if i == self.current {
            return direct
                || self.widgets[i].as_container_mut().is_some_and(|c| c.set_child_focus(id));
        }

        self.widgets[self.current].set_focus(FocusChange::Out);
        if !direct {
            if let Some(c) = self.widgets[i].as_container_mut() {
                c.point_at(id);
            }
        }
        self.current = i;
        debug!(target: "tw.widgets.focus", index = i, ?id, "focus set");
        self.widgets[i].set_focus(FocusChange::Set);
        true
    }

    /// Index of the child under the absolute point, preferring a child
    /// holding the mouse grab.
    #[must_use]
    pub fn mouse_target(&self, x: u16, y: u16) -> Option<usize> {
        self.widgets
            .iter()
            .position(|w| w.mouse_grab())
            .or_else(|| self.widgets.iter().position(|w| w.contains_point(x, y)))
    }

    pub fn at_mut(&mut self, index: usize) -> Option<&mut Box<dyn Widget>> {
        self.widgets.get_mut(index)
    }

    pub fn update_contents(&mut self) {
        for w in &mut self.widgets {
            w.update_contents();
        }
    }

    pub fn force_redraw(&mut self) {
        for w in &mut self.widgets {
            w.force_redraw();
        }
    }
}

impl std::fmt::Debug for FocusList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusList")
            .field("len", &self.widgets.len())
            .field("current", &self.current)
            .field("placeholder", &self.placeholder)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
