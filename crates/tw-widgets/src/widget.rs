//! Widget capability traits and the shared widget state.
//!
//! Every control implements [`Widget`]. The trait is small on purpose:
//! key and mouse handling, focus, geometry, painting and visibility. Most
//! of it has default bodies that work through [`WidgetBase`], the state
//! each widget embeds (identity, window, redraw flag, enabled/shown).
//!
//! Widgets that own other widgets also implement [`Container`] and expose
//! it through [`Widget::as_container`], so focus can be routed into nested
//! trees without inspecting concrete types.
//!
//! # Focus moves
//!
//! A widget never reaches up into its parent. When a key means "go to
//! another widget" it returns [`EventResult::Focus`] with a [`FocusMove`]
//! and the enclosing container acts on it. A move carries an explicit step
//! count, so a button that must skip two neighbours says so directly.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};

use tw_term::{KeyCode, KeyEvent, MouseButton, MouseEvent, Rect, Surface, Window};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Process-unique widget identity, used for focus targeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl WidgetId {
    /// A fresh identity. Never reused.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

// ---------------------------------------------------------------------------
// Focus and event results
// ---------------------------------------------------------------------------

/// A focus transition delivered through [`Widget::set_focus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChange {
    /// Focus left this widget.
    Out,
    /// Focus was placed here directly (click, hotkey, explicit target).
    Set,
    /// Focus arrived moving forward; containers focus their first child.
    InForward,
    /// Focus arrived moving backward; containers focus their last child.
    InBackward,
}

impl FocusChange {
    #[inline]
    #[must_use]
    pub const fn is_in(self) -> bool {
        !matches!(self, Self::Out)
    }
}

/// Direction of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Where the enclosing container should move focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMove {
    /// Advance over `n` focusable siblings.
    Forward(usize),
    /// Step back over `n` focusable siblings.
    Backward(usize),
}

impl FocusMove {
    /// The usual meaning of an arrow key: up/left go back one, down/right
    /// go forward one.
    #[must_use]
    pub const fn for_direction(dir: Direction) -> Self {
        match dir {
            Direction::Up | Direction::Left => Self::Backward(1),
            Direction::Down | Direction::Right => Self::Forward(1),
        }
    }

    /// Signed step count: forward is positive.
    #[must_use]
    pub fn steps(self) -> isize {
        let clamp = |n: usize| isize::try_from(n).unwrap_or(isize::MAX);
        match self {
            Self::Forward(n) => clamp(n),
            Self::Backward(n) => -clamp(n),
        }
    }
}

impl Direction {
    /// The direction an unmodified arrow key names.
    #[must_use]
    pub fn of_key(key: &KeyEvent) -> Option<Self> {
        if !key.modifiers.is_empty() {
            return None;
        }
        match key.code {
            KeyCode::Up => Some(Self::Up),
            KeyCode::Down => Some(Self::Down),
            KeyCode::Left => Some(Self::Left),
            KeyCode::Right => Some(Self::Right),
            _ => None,
        }
    }
}

/// Per-arrow focus moves for buttons and checkboxes.
///
/// Starts out as [`FocusMove::for_direction`]; a dialog overrides single
/// directions when the next widget in that direction is not the adjacent
/// one in traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrowMoves([FocusMove; 4]);

impl ArrowMoves {
    #[must_use]
    pub const fn get(&self, dir: Direction) -> FocusMove {
        self.0[dir as usize]
    }

    pub const fn set(&mut self, dir: Direction, mv: FocusMove) {
        self.0[dir as usize] = mv;
    }
}

impl Default for ArrowMoves {
    fn default() -> Self {
        Self([
            FocusMove::for_direction(Direction::Up),
            FocusMove::for_direction(Direction::Down),
            FocusMove::for_direction(Direction::Left),
            FocusMove::for_direction(Direction::Right),
        ])
    }
}

/// Outcome of [`Widget::process_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// The key was handled.
    Consumed,
    /// The key means nothing here; the caller may try elsewhere.
    Ignored,
    /// The key was handled as a request to move focus.
    Focus(FocusMove),
}

impl EventResult {
    /// Anything but [`Ignored`](Self::Ignored).
    #[inline]
    #[must_use]
    pub const fn is_handled(self) -> bool {
        !matches!(self, Self::Ignored)
    }

    #[must_use]
    pub const fn from_bool(handled: bool) -> Self {
        if handled { Self::Consumed } else { Self::Ignored }
    }
}

// ---------------------------------------------------------------------------
// WidgetBase
// ---------------------------------------------------------------------------

/// State shared by every widget.
#[derive(Debug)]
pub struct WidgetBase {
    id: WidgetId,
    /// The widget's drawing window, in absolute screen coordinates.
    pub window: Window,
    redraw: bool,
    enabled: bool,
    shown: bool,
}

impl WidgetBase {
    /// A shown, enabled widget with a `width`×`height` window at the origin.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let mut window = Window::new(Rect::new(0, 0, width, height));
        window.show();
        Self {
            id: WidgetId::next(),
            window,
            redraw: true,
            enabled: true,
            shown: true,
        }
    }

    #[inline]
    #[must_use]
    pub const fn id(&self) -> WidgetId {
        self.id
    }

    #[inline]
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.window.rect()
    }

    pub const fn force_redraw(&mut self) {
        self.redraw = true;
    }

    /// Consume the redraw flag.
    pub const fn take_redraw(&mut self) -> bool {
        let redraw = self.redraw;
        self.redraw = false;
        redraw
    }

    #[inline]
    #[must_use]
    pub const fn needs_redraw(&self) -> bool {
        self.redraw
    }

    pub const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.redraw = true;
    }

    #[inline]
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub const fn show(&mut self) {
        self.window.show();
        self.shown = true;
    }

    pub const fn hide(&mut self) {
        self.window.hide();
        self.shown = false;
    }

    #[inline]
    #[must_use]
    pub const fn is_shown(&self) -> bool {
        self.shown
    }

    pub const fn set_position(&mut self, x: u16, y: u16) {
        self.window.move_to(x, y);
    }

    /// Resize the window, marking the widget for redraw.
    pub fn resize(&mut self, width: u16, height: u16) -> bool {
        self.redraw = true;
        self.window.resize(width, height)
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// A UI control.
pub trait Widget {
    fn base(&self) -> &WidgetBase;
    fn base_mut(&mut self) -> &mut WidgetBase;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn process_key(&mut self, key: KeyEvent) -> EventResult;

    /// Paint if the redraw flag is set. Repeated calls without a state
    /// change must not repaint.
    fn update_contents(&mut self);

    fn id(&self) -> WidgetId {
        self.base().id()
    }

    /// A left or middle press on a widget that can take focus counts as
    /// handled; everything else is ignored.
    fn process_mouse_event(&mut self, event: MouseEvent) -> bool {
        self.accepts_focus()
            && (event.is_press(MouseButton::Left) || event.is_press(MouseButton::Middle))
    }

    fn set_focus(&mut self, _focus: FocusChange) {
        self.force_redraw();
    }

    fn accepts_focus(&self) -> bool {
        self.base().is_enabled() && self.base().is_shown()
    }

    /// Resize. Returns `false` when the size could not be applied.
    fn set_size(&mut self, width: u16, height: u16) -> bool {
        self.base_mut().resize(width, height)
    }

    fn set_position(&mut self, x: u16, y: u16) {
        self.base_mut().set_position(x, y);
    }

    fn rect(&self) -> Rect {
        self.base().rect()
    }

    fn force_redraw(&mut self) {
        self.base_mut().force_redraw();
    }

    fn show(&mut self) {
        self.base_mut().show();
    }

    fn hide(&mut self) {
        self.base_mut().hide();
    }

    fn is_shown(&self) -> bool {
        self.base().is_shown()
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.base_mut().set_enabled(enabled);
    }

    fn is_enabled(&self) -> bool {
        self.base().is_enabled()
    }

    /// The window this widget paints into.
    fn window(&self) -> &Window {
        &self.base().window
    }

    /// Whether Alt+`ch` should jump focus here.
    fn is_hotkey(&self, _ch: char) -> bool {
        false
    }

    /// Focus arrived through the hotkey. Buttons fire, checkboxes toggle.
    fn hotkey_activated(&mut self) {}

    /// Whether this widget wants every mouse event, including those
    /// outside its window (an open popup does).
    fn mouse_grab(&self) -> bool {
        false
    }

    /// Whether the absolute point lies on this widget, popups included.
    fn contains_point(&self, x: u16, y: u16) -> bool {
        self.is_shown() && self.rect().contains(x, y)
    }

    fn as_container(&self) -> Option<&dyn Container> {
        None
    }

    fn as_container_mut(&mut self) -> Option<&mut dyn Container> {
        None
    }
}

/// A widget that owns other widgets.
pub trait Container {
    /// Whether `id` is a descendant.
    fn is_child(&self, id: WidgetId) -> bool;

    /// Whether `id` is a descendant that would take focus.
    fn child_accepts_focus(&self, id: WidgetId) -> bool;

    /// Make `id` current at every level below this one without sending
    /// any focus transitions. The caller delivers them afterwards.
    fn point_at(&mut self, id: WidgetId) -> bool;

    /// Route focus to the descendant `id`. Returns `false` when `id` is
    /// not in this tree or does not accept focus.
    fn set_child_focus(&mut self, id: WidgetId) -> bool;
}

/// Paint `text` into `surface` at `(row, col)`, clipped to the surface.
pub(crate) fn paint_text(surface: &mut impl Surface, row: u16, col: u16, text: &str, style: tw_term::Style) {
    surface.set_paint(row, col);
    surface.addstr(text, style);
}

// ---------------------------------------------------------------------------
// Placeholder
// ---------------------------------------------------------------------------

/// Invisible stand-in that holds focus in a container with no focusable
/// children.
#[derive(Debug)]
pub struct Placeholder {
    base: WidgetBase,
}

impl Placeholder {
    #[must_use]
    pub fn new() -> Self {
        let mut base = WidgetBase::new(1, 1);
        base.window.hide();
        Self { base }
    }
}

impl Default for Placeholder {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Placeholder {
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

    fn process_key(&mut self, _key: KeyEvent) -> EventResult {
        EventResult::Ignored
    }

    fn update_contents(&mut self) {
        self.base.take_redraw();
    }

    fn accepts_focus(&self) -> bool {
        true
    }

    fn process_mouse_event(&mut self, _event: MouseEvent) -> bool {
        false
    }

    fn contains_point(&self, _x: u16, _y: u16) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
