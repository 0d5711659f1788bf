//! Split panes: a tree of widgets tiling one screen area.
//!
//! A [`Split`] node lays its children out along one axis and keeps one of
//! them current. Each child is a [`Pane`]: either a leaf widget or a nested
//! split, so the whole layout is a tree.
//!
//! ```text
//! Split (horizontal)
//! ├── Leaf(editor 1)        top half
//! └── Split (vertical)
//!     ├── Leaf(editor 2)    bottom left
//!     └── Leaf(editor 3)    bottom right
//! ```
//!
//! # Tree edits
//!
//! [`Split::split`] adds a widget next to the current leaf. Splitting along
//! the node's own axis (or a node with a single child) inserts a sibling;
//! splitting across it wraps the current leaf in a new nested node first.
//! [`Split::unsplit`] removes the current leaf, and a nested node left with
//! one child is replaced by that child.
//!
//! # Focus
//!
//! [`Split::next`] and [`Split::previous`] walk the leaves depth first,
//! wrapping at the ends. F8 and Alt+8 go forward, Shift+F8 goes back.

use std::any::Any;

use tracing::debug;
use tw_term::{KeyCode, KeyEvent, MouseButton, MouseEvent, Rect};

use crate::widget::{
    Container, Direction, EventResult, FocusChange, Placeholder, Widget, WidgetBase, WidgetId,
};

/// The axis a split node divides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Children stacked top to bottom; the height is divided.
    Horizontal,
    /// Children side by side; the width is divided.
    Vertical,
}

impl Orientation {
    /// Cut `area` into `count` slices along this axis. Every slice gets
    /// `extent / count` cells and the first `extent % count` slices one more,
    /// so the slices tile `area` exactly.
    #[must_use]
    pub fn divide(self, area: Rect, count: usize) -> Vec<Rect> {
        let Ok(n) = u16::try_from(count) else {
            return Vec::new();
        };
        if n == 0 {
            return Vec::new();
        }
        let extent = match self {
            Self::Horizontal => area.h,
            Self::Vertical => area.w,
        };
        let step = extent / n;
        let left_over = extent % n;
        (0..n)
            .map(|idx| {
                let size = step + u16::from(idx < left_over);
                let offset = idx * step + idx.min(left_over);
                match self {
                    Self::Horizontal => Rect::new(area.x, area.y + offset, area.w, size),
                    Self::Vertical => Rect::new(area.x + offset, area.y, size, area.h),
                }
            })
            .collect()
    }
}

/// A child of a split node.
pub enum Pane {
    Leaf(Box<dyn Widget>),
    Split(Box<Split>),
}

impl Pane {
    fn widget(&self) -> &dyn Widget {
        match self {
            Self::Leaf(w) => &**w,
            Self::Split(s) => &**s,
        }
    }

    fn widget_mut(&mut self) -> &mut dyn Widget {
        match self {
            Self::Leaf(w) => &mut **w,
            Self::Split(s) => &mut **s,
        }
    }

    fn collect_leaves(&self, out: &mut Vec<(WidgetId, Rect)>) {
        match self {
            Self::Leaf(w) => out.push((w.id(), w.rect())),
            Self::Split(s) => {
                for child in &s.children {
                    child.collect_leaves(out);
                }
            }
        }
    }

    fn layout_into(&self, area: Rect, out: &mut Vec<(WidgetId, Rect)>) {
        match self {
            Self::Leaf(w) => out.push((w.id(), area)),
            Self::Split(s) => s.layout_into(area, out),
        }
    }
}

/// A node of the split tree. The root is an ordinary widget.
pub struct Split {
    base: WidgetBase,
    orientation: Orientation,
    children: Vec<Pane>,
    current: usize,
    focus: bool,
}

impl Split {
    /// A node holding `widget` alone.
    #[must_use]
    pub fn new(widget: Box<dyn Widget>) -> Self {
        let mut base = WidgetBase::new(3, 3);
        base.window.hide();
        let mut split = Self {
            base,
            orientation: Orientation::Horizontal,
            children: vec![Pane::Leaf(widget)],
            current: 0,
            focus: false,
        };
        split.relayout();
        split
    }

    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    #[must_use]
    pub fn children(&self) -> &[Pane] {
        &self.children
    }

    /// Number of leaves in the tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.children
            .iter()
            .map(|p| match p {
                Pane::Leaf(_) => 1,
                Pane::Split(s) => s.leaf_count(),
            })
            .sum()
    }

    /// The leaf that has, or would have, focus.
    #[must_use]
    pub fn current(&self) -> &dyn Widget {
        match &self.children[self.current] {
            Pane::Leaf(w) => &**w,
            Pane::Split(s) => s.current(),
        }
    }

    pub fn current_mut(&mut self) -> &mut dyn Widget {
        match &mut self.children[self.current] {
            Pane::Leaf(w) => &mut **w,
            Pane::Split(s) => s.current_mut(),
        }
    }

    #[must_use]
    pub fn current_id(&self) -> WidgetId {
        self.current().id()
    }

    // -- Tree edits ---------------------------------------------------------

    /// Put `widget` next to the current leaf and make it current.
    pub fn split(&mut self, widget: Box<dyn Widget>, orientation: Orientation) {
        if let Pane::Split(inner) = &mut self.children[self.current] {
            inner.split(widget, orientation);
            return;
        }

        if self.children.len() == 1 || orientation == self.orientation {
            debug!(target: "tw.widgets.split", ?orientation, at = self.current + 1, "insert pane");
            self.orientation = orientation;
            if self.focus {
                self.children[self.current].widget_mut().set_focus(FocusChange::Out);
            }
            self.current += 1;
            self.children.insert(self.current, Pane::Leaf(widget));
            self.relayout();
            if self.focus {
                self.children[self.current].widget_mut().set_focus(FocusChange::Set);
            }
            return;
        }

        debug!(target: "tw.widgets.split", ?orientation, "wrap current pane in nested split");
        let slot = &mut self.children[self.current];
        let Pane::Leaf(old) = std::mem::replace(slot, Pane::Leaf(Box::new(Placeholder::new())))
        else {
            return;
        };
        let area = old.rect();
        let mut inner = Self::new(old);
        inner.orientation = self.orientation;
        inner.focus = self.focus;
        inner.place(area);
        inner.split(widget, orientation);
        *slot = Pane::Split(Box::new(inner));
        self.relayout();
    }

    /// Remove the current leaf and return it. The last remaining leaf of the
    /// root is never removed.
    pub fn unsplit(&mut self) -> Option<Box<dyn Widget>> {
        let (removed, single) = self.unsplit_inner();
        if single && removed.is_some() && self.focus {
            self.children[self.current].widget_mut().set_focus(FocusChange::Set);
        }
        removed
    }

    /// The removed widget, and whether this node is left with a single child
    /// and should be replaced by it. A node left single does not focus the
    /// survivor; whoever replaces the node does.
    fn unsplit_inner(&mut self) -> (Option<Box<dyn Widget>>, bool) {
        let cur = self.current;
        if let Pane::Split(inner) = &mut self.children[cur] {
            let (removed, collapse) = inner.unsplit_inner();
            if collapse {
                let hoisted = match &mut self.children[cur] {
                    Pane::Split(inner) => inner.children.pop(),
                    Pane::Leaf(_) => None,
                };
                if let Some(pane) = hoisted {
                    debug!(target: "tw.widgets.split", "collapse nested split");
                    self.children[cur] = pane;
                    self.relayout();
                    if self.focus {
                        self.children[cur].widget_mut().set_focus(FocusChange::Set);
                    }
                }
            }
            return (removed, false);
        }

        if self.children.len() == 1 {
            return (None, true);
        }
        let Pane::Leaf(mut removed) = self.children.remove(cur) else {
            return (None, false);
        };
        if self.focus {
            removed.set_focus(FocusChange::Out);
        }
        if cur == self.children.len() {
            self.current = cur - 1;
            if let Pane::Split(s) = &mut self.children[self.current] {
                s.set_to_end();
            }
        } else if let Pane::Split(s) = &mut self.children[cur] {
            s.set_to_begin();
        }
        debug!(target: "tw.widgets.split", remaining = self.children.len(), "remove pane");
        self.relayout();
        let single = self.children.len() == 1;
        if self.focus && !single {
            self.children[self.current].widget_mut().set_focus(FocusChange::Set);
        }
        (Some(removed), single)
    }

    // -- Traversal ----------------------------------------------------------

    /// Focus the next leaf, depth first, wrapping to the first.
    pub fn next(&mut self) {
        self.step(true, true);
    }

    /// Focus the previous leaf, wrapping to the last.
    pub fn previous(&mut self) {
        self.step(false, true);
    }

    /// Move one leaf along. A nested node gets the first try; without `wrap`
    /// running off the end returns `false` and leaves this node unchanged.
    fn step(&mut self, forward: bool, wrap: bool) -> bool {
        if let Pane::Split(inner) = &mut self.children[self.current] {
            if inner.step(forward, false) {
                return true;
            }
        }
        let last = self.children.len() - 1;
        let target = match (forward, self.current) {
            (true, cur) if cur < last => cur + 1,
            (true, _) if wrap => 0,
            (false, cur) if cur > 0 => cur - 1,
            (false, _) if wrap => last,
            _ => return false,
        };

        if self.focus {
            self.children[self.current].widget_mut().set_focus(FocusChange::Out);
        }
        self.current = target;
        if let Pane::Split(s) = &mut self.children[target] {
            if forward {
                s.set_to_begin();
            } else {
                s.set_to_end();
            }
        }
        if self.focus {
            let change = if forward {
                FocusChange::InForward
            } else {
                FocusChange::InBackward
            };
            self.children[target].widget_mut().set_focus(change);
        }
        true
    }

    /// Point every level at its first child.
    pub fn set_to_begin(&mut self) {
        self.current = 0;
        if let Pane::Split(s) = &mut self.children[0] {
            s.set_to_begin();
        }
    }

    /// Point every level at its last child.
    pub fn set_to_end(&mut self) {
        self.current = self.children.len() - 1;
        if let Pane::Split(s) = &mut self.children[self.current] {
            s.set_to_end();
        }
    }

    fn switch_to(&mut self, index: usize) {
        if index == self.current {
            return;
        }
        if self.focus {
            self.children[self.current].widget_mut().set_focus(FocusChange::Out);
        }
        self.current = index;
        if self.focus {
            self.children[index].widget_mut().set_focus(FocusChange::Set);
        }
    }

    // -- Layout -------------------------------------------------------------

    /// Leaf rectangles as currently placed, depth first.
    #[must_use]
    pub fn leaves(&self) -> Vec<(WidgetId, Rect)> {
        let mut out = Vec::new();
        for child in &self.children {
            child.collect_leaves(&mut out);
        }
        out
    }

    /// Where each leaf would go if the tree filled `area`.
    #[must_use]
    pub fn layout(&self, area: Rect) -> Vec<(WidgetId, Rect)> {
        let mut out = Vec::new();
        self.layout_into(area, &mut out);
        out
    }

    fn layout_into(&self, area: Rect, out: &mut Vec<(WidgetId, Rect)>) {
        let slices = self.orientation.divide(area, self.children.len());
        for (child, slice) in self.children.iter().zip(slices) {
            child.layout_into(slice, out);
        }
    }

    /// The nearest leaf in `dir` from the current one.
    #[must_use]
    pub fn neighbor(&self, dir: Direction) -> Option<WidgetId> {
        let rects = self.leaves();
        let current = self.current_id();
        let cur = rects.iter().find(|(id, _)| *id == current)?.1;
        let mid = |r: Rect| (i32::from(r.x) + i32::from(r.w) / 2, i32::from(r.y) + i32::from(r.h) / 2);
        let (cx, cy) = mid(cur);

        rects
            .iter()
            .filter(|(id, r)| {
                *id != current
                    && match dir {
                        Direction::Left => r.right() <= cur.x,
                        Direction::Right => r.x >= cur.right(),
                        Direction::Up => r.bottom() <= cur.y,
                        Direction::Down => r.y >= cur.bottom(),
                    }
            })
            .min_by_key(|(_, r)| {
                let (x, y) = mid(*r);
                match dir {
                    Direction::Left | Direction::Right => ((x - cx).abs(), (y - cy).abs()),
                    Direction::Up | Direction::Down => ((y - cy).abs(), (x - cx).abs()),
                }
            })
            .map(|(id, _)| *id)
    }

    fn place(&mut self, area: Rect) {
        self.base.set_position(area.x, area.y);
        self.base.resize(area.w, area.h);
        self.relayout();
    }

    /// Give every child its slice of this node's area.
    fn relayout(&mut self) -> bool {
        let slices = self.orientation.divide(self.base.rect(), self.children.len());
        let mut ok = true;
        for (child, slice) in self.children.iter_mut().zip(slices) {
            let w = child.widget_mut();
            ok &= w.set_size(slice.w, slice.h);
            w.set_position(slice.x, slice.y);
        }
        ok
    }
}

impl Widget for Split {
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
        let next = (key.code == KeyCode::F(8) && key.modifiers.is_empty())
            || (key.code == KeyCode::Char('8') && key.has_alt() && !key.has_ctrl());
        if next {
            self.next();
            return EventResult::Consumed;
        }
        if key.code == KeyCode::F(8) && key.has_shift() && key.modifiers_without_shift().is_empty() {
            self.previous();
            return EventResult::Consumed;
        }
        self.children[self.current].widget_mut().process_key(key)
    }

    fn process_mouse_event(&mut self, event: MouseEvent) -> bool {
        let target = self
            .children
            .iter()
            .position(|p| p.widget().mouse_grab())
            .or_else(|| {
                self.children
                    .iter()
                    .position(|p| p.widget().contains_point(event.x, event.y))
            });
        let Some(index) = target else {
            return false;
        };
        let handled = self.children[index].widget_mut().process_mouse_event(event);
        if event.is_press(MouseButton::Left) && self.children[index].widget().accepts_focus() {
            self.switch_to(index);
        }
        handled
    }

    fn set_focus(&mut self, focus: FocusChange) {
        self.focus = focus.is_in();
        self.children[self.current].widget_mut().set_focus(focus);
    }

    fn set_size(&mut self, width: u16, height: u16) -> bool {
        let resized = self.base.resize(width, height);
        self.relayout() && resized
    }

    fn set_position(&mut self, x: u16, y: u16) {
        self.base.set_position(x, y);
        self.relayout();
    }

    fn contains_point(&self, x: u16, y: u16) -> bool {
        self.base.is_shown() && self.base.rect().contains(x, y)
    }

    fn mouse_grab(&self) -> bool {
        self.children.iter().any(|p| p.widget().mouse_grab())
    }

    fn update_contents(&mut self) {
        self.base.take_redraw();
        for child in &mut self.children {
            child.widget_mut().update_contents();
        }
    }

    fn force_redraw(&mut self) {
        self.base.force_redraw();
        for child in &mut self.children {
            child.widget_mut().force_redraw();
        }
    }

    fn as_container(&self) -> Option<&dyn Container> {
        Some(self)
    }

    fn as_container_mut(&mut self) -> Option<&mut dyn Container> {
        Some(self)
    }
}

impl Container for Split {
    fn is_child(&self, id: WidgetId) -> bool {
        self.children.iter().any(|p| match p {
            Pane::Leaf(w) => w.id() == id,
            Pane::Split(s) => s.is_child(id),
        })
    }

    fn child_accepts_focus(&self, id: WidgetId) -> bool {
        self.children.iter().any(|p| match p {
            Pane::Leaf(w) => w.id() == id && w.accepts_focus(),
            Pane::Split(s) => s.child_accepts_focus(id),
        })
    }

    fn point_at(&mut self, id: WidgetId) -> bool {
        let found = self.children.iter().position(|p| match p {
            Pane::Leaf(w) => w.id() == id,
            Pane::Split(s) => s.is_child(id),
        });
        let Some(index) = found else {
            return false;
        };
        if let Pane::Split(inner) = &mut self.children[index] {
            if !inner.point_at(id) {
                return false;
            }
        }
        self.current = index;
        true
    }

    fn set_child_focus(&mut self, id: WidgetId) -> bool {
        if !self.child_accepts_focus(id) {
            return false;
        }
        let found = self.children.iter().position(|p| match p {
            Pane::Leaf(w) => w.id() == id,
            Pane::Split(s) => s.is_child(id),
        });
        let Some(index) = found else {
            return false;
        };
        if let Pane::Split(inner) = &mut self.children[index] {
            if !inner.set_child_focus(id) {
                return false;
            }
        }
        self.switch_to(index);
        true
    }
}

impl std::fmt::Debug for Split {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Split")
            .field("orientation", &self.orientation)
            .field("children", &self.children)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for Pane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Leaf(w) => f.debug_tuple("Leaf").field(&w.id()).finish(),
            Self::Split(s) => std::fmt::Debug::fmt(&**s, f),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tw_term::MouseEventKind;

    use super::*;
    use crate::focus::tests::{Log, Probe};

    const AREA: Rect = Rect::new(0, 0, 80, 24);

    fn root(log: &Log) -> (Split, WidgetId) {
        let a = Probe::new(log, true);
        let id = a.id();
        let mut s = Split::new(a);
        s.set_size(AREA.w, AREA.h);
        s.set_position(AREA.x, AREA.y);
        s.set_focus(FocusChange::Set);
        (s, id)
    }

    fn add(s: &mut Split, log: &Log, orientation: Orientation) -> WidgetId {
        let w = Probe::new(log, true);
        let id = w.id();
        s.split(w, orientation);
        id
    }

    fn rect_of(s: &Split, id: WidgetId) -> Rect {
        s.leaves().into_iter().find(|(i, _)| *i == id).unwrap().1
    }

    /// A on top, B and C side by side below, C current.
    fn three_panes(log: &Log) -> (Split, [WidgetId; 3]) {
        let (mut s, a) = root(log);
        let b = add(&mut s, log, Orientation::Horizontal);
        let c = add(&mut s, log, Orientation::Vertical);
        (s, [a, b, c])
    }

    // -- Layout -------------------------------------------------------------

    #[test]
    fn leftover_goes_to_first_slices() {
        let slices = Orientation::Horizontal.divide(Rect::new(0, 0, 5, 10), 3);
        let heights: Vec<u16> = slices.iter().map(|r| r.h).collect();
        assert_eq!(heights, vec![4, 3, 3]);
        assert_eq!(heights.iter().sum::<u16>(), 10);
        assert_eq!(slices[2].y, 7);

        let slices = Orientation::Vertical.divide(Rect::new(2, 0, 11, 1), 2);
        assert_eq!(slices, vec![Rect::new(2, 0, 6, 1), Rect::new(8, 0, 5, 1)]);
    }

    #[test]
    fn single_leaf_fills_area() {
        let log = Log::default();
        let (s, a) = root(&log);
        assert_eq!(s.leaves(), vec![(a, AREA)]);
    }

    #[test]
    fn layout_matches_placement() {
        let log = Log::default();
        let (s, _) = three_panes(&log);
        assert_eq!(s.layout(AREA), s.leaves());
        let half = s.layout(Rect::new(0, 0, 40, 10));
        assert_eq!(half[0].1, Rect::new(0, 0, 40, 5));
        assert_eq!(half[2].1, Rect::new(20, 5, 20, 5));
    }

    // -- Tree edits ---------------------------------------------------------

    #[test]
    fn split_same_axis_inserts_sibling() {
        let log = Log::default();
        let (mut s, a) = root(&log);
        let b = add(&mut s, &log, Orientation::Vertical);
        let c = add(&mut s, &log, Orientation::Vertical);
        assert_eq!(s.len(), 3);
        assert_eq!(s.orientation(), Orientation::Vertical);
        assert_eq!(s.current_id(), c);
        assert_eq!(rect_of(&s, a), Rect::new(0, 0, 27, 24));
        assert_eq!(rect_of(&s, b), Rect::new(27, 0, 27, 24));
        assert_eq!(rect_of(&s, c), Rect::new(54, 0, 26, 24));
    }

    #[test]
    fn split_across_axis_nests() {
        let log = Log::default();
        let (s, [a, b, c]) = three_panes(&log);
        assert_eq!(s.len(), 2);
        assert!(matches!(s.children()[1], Pane::Split(_)));
        assert_eq!(s.leaf_count(), 3);
        assert_eq!(rect_of(&s, a), Rect::new(0, 0, 80, 12));
        assert_eq!(rect_of(&s, b), Rect::new(0, 12, 40, 12));
        assert_eq!(rect_of(&s, c), Rect::new(40, 12, 40, 12));
        assert_eq!(s.current_id(), c);
    }

    #[test]
    fn split_moves_focus_to_new_pane() {
        let log = Log::default();
        let (mut s, a) = root(&log);
        log.borrow_mut().clear();
        let b = add(&mut s, &log, Orientation::Horizontal);
        assert_eq!(*log.borrow(), vec![(a, FocusChange::Out), (b, FocusChange::Set)]);
    }

    #[test]
    fn unsplit_collapses_nested_node() {
        let log = Log::default();
        let (mut s, [a, b, c]) = three_panes(&log);
        log.borrow_mut().clear();
        let removed = s.unsplit().unwrap();
        assert_eq!(removed.id(), c);
        assert_eq!(*log.borrow(), vec![(c, FocusChange::Out), (b, FocusChange::Set)]);
        assert_eq!(s.len(), 2);
        assert!(s.children().iter().all(|p| matches!(p, Pane::Leaf(_))));
        assert_eq!(rect_of(&s, b), Rect::new(0, 12, 80, 12));
        assert_eq!(rect_of(&s, a), Rect::new(0, 0, 80, 12));
        assert_eq!(s.current_id(), b);
    }

    #[test]
    fn unsplit_two_panes_leaves_survivor_full_size() {
        let log = Log::default();
        let (mut s, a) = root(&log);
        let b = add(&mut s, &log, Orientation::Horizontal);
        log.borrow_mut().clear();
        let removed = s.unsplit().unwrap();
        assert_eq!(removed.id(), b);
        assert_eq!(s.leaves(), vec![(a, AREA)]);
        assert_eq!(*log.borrow(), vec![(b, FocusChange::Out), (a, FocusChange::Set)]);
    }

    #[test]
    fn last_pane_stays() {
        let log = Log::default();
        let (mut s, a) = root(&log);
        assert!(s.unsplit().is_none());
        assert_eq!(s.current_id(), a);
    }

    // -- Traversal ----------------------------------------------------------

    #[test]
    fn next_and_previous_walk_leaves_depth_first() {
        let log = Log::default();
        let (mut s, [a, b, c]) = three_panes(&log);
        let mut order = Vec::new();
        for _ in 0..3 {
            s.next();
            order.push(s.current_id());
        }
        assert_eq!(order, vec![a, b, c]);
        s.previous();
        assert_eq!(s.current_id(), b);
        s.previous();
        s.previous();
        assert_eq!(s.current_id(), c);
    }

    #[test]
    fn f8_keys_cycle_and_others_reach_leaf() {
        let log = Log::default();
        let (mut s, [a, b, _]) = three_panes(&log);
        assert_eq!(s.process_key(KeyEvent::plain(KeyCode::F(8))), EventResult::Consumed);
        assert_eq!(s.current_id(), a);
        s.process_key(KeyEvent::char('8').alt());
        assert_eq!(s.current_id(), b);
        s.process_key(KeyEvent::plain(KeyCode::F(8)).shift());
        assert_eq!(s.current_id(), a);
        // Probe consumes every key.
        assert_eq!(s.process_key(KeyEvent::char('x')), EventResult::Consumed);
    }

    #[test]
    fn neighbor_follows_geometry() {
        let log = Log::default();
        let (s, [a, b, _]) = three_panes(&log);
        assert_eq!(s.neighbor(Direction::Up), Some(a));
        assert_eq!(s.neighbor(Direction::Left), Some(b));
        assert_eq!(s.neighbor(Direction::Right), None);
    }

    #[test]
    fn click_and_explicit_target_focus_leaf() {
        let log = Log::default();
        let (mut s, [a, b, _]) = three_panes(&log);
        let click = MouseEvent::new(MouseEventKind::Press(MouseButton::Left), 5, 3);
        s.process_mouse_event(click);
        assert_eq!(s.current_id(), a);

        assert!(s.is_child(b));
        assert!(s.set_child_focus(b));
        assert_eq!(s.current_id(), b);
        assert!(!s.set_child_focus(WidgetId::next()));
    }

    #[test]
    fn explicit_target_in_nested_node_gets_set() {
        let log = Log::default();
        let (mut s, [a, b, c]) = three_panes(&log);
        s.process_key(KeyEvent::plain(KeyCode::F(8)));
        assert_eq!(s.current_id(), a);
        log.borrow_mut().clear();
        assert!(s.set_child_focus(b));
        assert_eq!(*log.borrow(), vec![(a, FocusChange::Out), (b, FocusChange::Set)]);
        assert!(s.child_accepts_focus(c));
    }

    #[test]
    fn unfocusable_nested_target_is_refused() {
        let log = Log::default();
        let (mut s, a) = root(&log);
        let b = add(&mut s, &log, Orientation::Horizontal);
        let c = Probe::new(&log, false);
        let c_id = c.id();
        s.split(c, Orientation::Vertical);
        s.previous();
        s.previous();
        assert_eq!(s.current_id(), a);
        log.borrow_mut().clear();
        assert!(!s.set_child_focus(c_id));
        assert_eq!(s.current_id(), a);
        assert!(log.borrow().is_empty());
        assert!(s.set_child_focus(b));
    }
}
