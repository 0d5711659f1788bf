// SPDX-License-Identifier: MIT
//
// Input vocabulary.
//
// The structured events widgets consume: keys with modifier flags, mouse
// actions with click counts, and the small parser for human-readable key
// descriptions (`"ctrl+x"`, `"shift+f8"`) used by key-binding
// configuration.
//
// Decoding raw terminal bytes into these events belongs to the terminal
// backend and is not done here. What is done here is the enrichment a
// backend cannot do on its own: turning a stream of single presses into
// double and triple clicks (`ClickTracker`).

use std::fmt;
use std::time::{Duration, Instant};

use bitflags::bitflags;
use thiserror::Error;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A structured input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),
    /// A mouse event (button action or movement with position).
    Mouse(MouseEvent),
    /// Bracketed paste content, delivered as one event.
    Paste(String),
}

/// A keyboard event with key identity, modifiers, and press state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys (Shift, Alt, Ctrl).
    pub modifiers: Modifiers,
    /// Press, repeat, or release.
    pub kind: KeyEventKind,
}

/// Key press / repeat / release distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum KeyEventKind {
    /// Initial key press (or legacy mode where state is unknown).
    #[default]
    Press,
    /// Key held down long enough to trigger auto-repeat.
    Repeat,
    /// Key released.
    Release,
}

/// Identity of a key.
///
/// Named keys have dedicated variants; printable characters use
/// [`Char`](KeyCode::Char). Function keys use [`F`](KeyCode::F).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A Unicode character.
    Char(char),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    // ── Function keys ───────────────────────────────────────────
    /// F1 through F35.
    F(u8),
}

bitflags! {
    /// Keyboard modifier flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

impl KeyEvent {
    /// A key press with the given modifiers.
    #[inline]
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self {
            code,
            modifiers,
            kind: KeyEventKind::Press,
        }
    }

    /// A key press without modifiers.
    #[inline]
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }

    /// A plain printable character press.
    #[inline]
    #[must_use]
    pub const fn char(ch: char) -> Self {
        Self::plain(KeyCode::Char(ch))
    }

    /// The same key with `SHIFT` added.
    #[inline]
    #[must_use]
    pub const fn shift(self) -> Self {
        Self::new(self.code, self.modifiers.union(Modifiers::SHIFT))
    }

    /// The same key with `CTRL` added.
    #[inline]
    #[must_use]
    pub const fn ctrl(self) -> Self {
        Self::new(self.code, self.modifiers.union(Modifiers::CTRL))
    }

    /// The same key with `ALT` added.
    #[inline]
    #[must_use]
    pub const fn alt(self) -> Self {
        Self::new(self.code, self.modifiers.union(Modifiers::ALT))
    }

    #[inline]
    #[must_use]
    pub const fn has_shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    #[inline]
    #[must_use]
    pub const fn has_ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    #[inline]
    #[must_use]
    pub const fn has_alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    /// The modifier set with `SHIFT` removed. Used by navigation handling,
    /// where shift only means "extend the selection".
    #[inline]
    #[must_use]
    pub const fn modifiers_without_shift(&self) -> Modifiers {
        self.modifiers.difference(Modifiers::SHIFT)
    }

    /// The printable character carried by this event, if any.
    ///
    /// Returns `None` for named keys and for characters combined with Ctrl
    /// or Alt (those are commands, not text).
    #[must_use]
    pub fn printable(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(ch)
                if !self.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) =>
            {
                Some(ch)
            }
            _ => None,
        }
    }

    /// Parse a key description such as `"ctrl+x"`, `"shift+f8"`,
    /// `"alt+8"` or `"ctrl+space"`.
    ///
    /// Modifier names and key names are case-insensitive. A single
    /// character names itself (`"a"`, `"+"`).
    ///
    /// # Errors
    ///
    /// Returns [`KeySpecError`] when a modifier or key name is unknown or
    /// the description is empty.
    pub fn parse(spec: &str) -> Result<Self, KeySpecError> {
        let trimmed = spec.trim();
        if trimmed.is_empty() {
            return Err(KeySpecError::Empty);
        }

        // A lone "+" (or "ctrl++") names the plus key itself.
        let (mods_part, key_part) = match trimmed.strip_suffix("++") {
            Some(prefix) => (Some(prefix), "+"),
            None if trimmed == "+" => (None, "+"),
            None => match trimmed.rsplit_once('+') {
                Some((mods, key)) => (Some(mods), key),
                None => (None, trimmed),
            },
        };

        let mut modifiers = Modifiers::empty();
        if let Some(mods) = mods_part {
            for name in mods.split('+').filter(|s| !s.is_empty()) {
                modifiers |= match name.to_ascii_lowercase().as_str() {
                    "ctrl" | "control" | "c" => Modifiers::CTRL,
                    "shift" | "s" => Modifiers::SHIFT,
                    "alt" | "meta" | "m" | "a" => Modifiers::ALT,
                    _ => return Err(KeySpecError::UnknownModifier(name.to_string())),
                };
            }
        }

        let code = parse_key_name(key_part)?;
        Ok(Self::new(code, modifiers))
    }
}

fn parse_key_name(name: &str) -> Result<KeyCode, KeySpecError> {
    let mut chars = name.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(ch));
    }

    let lower = name.to_ascii_lowercase();
    let code = match lower.as_str() {
        "space" => KeyCode::Char(' '),
        "enter" | "return" | "nl" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backspace" | "bs" => KeyCode::Backspace,
        "escape" | "esc" => KeyCode::Escape,
        "delete" | "del" => KeyCode::Delete,
        "insert" | "ins" => KeyCode::Insert,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdn" => KeyCode::PageDown,
        _ => {
            let number = lower
                .strip_prefix('f')
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|n| (1..=35).contains(n));
            match number {
                Some(n) => KeyCode::F(n),
                None => return Err(KeySpecError::UnknownKey(name.to_string())),
            }
        }
    };
    Ok(code)
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_ctrl() {
            f.write_str("ctrl+")?;
        }
        if self.has_alt() {
            f.write_str("alt+")?;
        }
        if self.has_shift() {
            f.write_str("shift+")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(ch) => write!(f, "{ch}"),
            KeyCode::Enter => f.write_str("enter"),
            KeyCode::Tab => f.write_str("tab"),
            KeyCode::Backspace => f.write_str("backspace"),
            KeyCode::Escape => f.write_str("escape"),
            KeyCode::Delete => f.write_str("delete"),
            KeyCode::Insert => f.write_str("insert"),
            KeyCode::Up => f.write_str("up"),
            KeyCode::Down => f.write_str("down"),
            KeyCode::Left => f.write_str("left"),
            KeyCode::Right => f.write_str("right"),
            KeyCode::Home => f.write_str("home"),
            KeyCode::End => f.write_str("end"),
            KeyCode::PageUp => f.write_str("pageup"),
            KeyCode::PageDown => f.write_str("pagedown"),
            KeyCode::F(n) => write!(f, "f{n}"),
        }
    }
}

/// Error produced by [`KeyEvent::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeySpecError {
    #[error("empty key description")]
    Empty,
    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),
    #[error("unknown key name `{0}`")]
    UnknownKey(String),
}

// ─── Mouse ──────────────────────────────────────────────────────────────────

/// A mouse event with action, absolute screen position, and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// What happened (press, release, drag, move, scroll).
    pub kind: MouseEventKind,
    /// 0-indexed screen column.
    pub x: u16,
    /// 0-indexed screen row.
    pub y: u16,
    /// Active modifier keys during the mouse event.
    pub modifiers: Modifiers,
    /// Click count for presses: 1 single, 2 double, 3 triple. Zero for
    /// anything that is not a press. See [`ClickTracker`].
    pub clicks: u8,
}

/// Mouse event classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    /// Button pressed.
    Press(MouseButton),
    /// Button released.
    Release(MouseButton),
    /// Mouse moved while a button is held.
    Drag(MouseButton),
    /// Mouse moved without any button held.
    Move,
    /// Scroll wheel up.
    ScrollUp,
    /// Scroll wheel down.
    ScrollDown,
}

/// Mouse button identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseEvent {
    /// A mouse event without modifiers. Presses start as single clicks.
    #[must_use]
    pub const fn new(kind: MouseEventKind, x: u16, y: u16) -> Self {
        let clicks = if matches!(kind, MouseEventKind::Press(_)) { 1 } else { 0 };
        Self {
            kind,
            x,
            y,
            modifiers: Modifiers::empty(),
            clicks,
        }
    }

    /// The same event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// The same event with an explicit click count.
    #[must_use]
    pub const fn with_clicks(mut self, clicks: u8) -> Self {
        self.clicks = clicks;
        self
    }

    /// True for a press of `button`.
    #[must_use]
    pub fn is_press(&self, button: MouseButton) -> bool {
        self.kind == MouseEventKind::Press(button)
    }

    #[must_use]
    pub const fn has_shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

// ─── Click tracking ─────────────────────────────────────────────────────────

/// Maximum delay between presses that still counts as a multi-click.
pub const MULTI_CLICK_INTERVAL: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy)]
struct LastClick {
    at: Instant,
    x: u16,
    y: u16,
    button: MouseButton,
    count: u8,
}

/// Derives double and triple clicks from a stream of presses.
///
/// A press counts as a follow-up click when it uses the same button, lands
/// on the same cell, and arrives within [`MULTI_CLICK_INTERVAL`] of the
/// previous press. The count cycles 1 → 2 → 3 → 1.
#[derive(Debug, Default)]
pub struct ClickTracker {
    last: Option<LastClick>,
}

impl ClickTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Annotate `event` with its click count, observed at time `now`.
    ///
    /// Non-press events pass through with `clicks = 0`.
    #[must_use]
    pub fn track(&mut self, mut event: MouseEvent, now: Instant) -> MouseEvent {
        let MouseEventKind::Press(button) = event.kind else {
            event.clicks = 0;
            return event;
        };

        let count = match self.last {
            Some(last)
                if last.button == button
                    && last.x == event.x
                    && last.y == event.y
                    && now.saturating_duration_since(last.at) <= MULTI_CLICK_INTERVAL =>
            {
                if last.count >= 3 { 1 } else { last.count + 1 }
            }
            _ => 1,
        };

        self.last = Some(LastClick {
            at: now,
            x: event.x,
            y: event.y,
            button,
            count,
        });
        event.clicks = count;
        event
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Key constructors ────────────────────────────────────────────────

    #[test]
    fn builders_add_modifiers() {
        let key = KeyEvent::plain(KeyCode::Left).shift().ctrl();
        assert!(key.has_shift());
        assert!(key.has_ctrl());
        assert!(!key.has_alt());
        assert_eq!(key.modifiers_without_shift(), Modifiers::CTRL);
    }

    #[test]
    fn printable_ignores_commands() {
        assert_eq!(KeyEvent::char('a').printable(), Some('a'));
        assert_eq!(KeyEvent::char('A').shift().printable(), Some('A'));
        assert_eq!(KeyEvent::char('x').ctrl().printable(), None);
        assert_eq!(KeyEvent::plain(KeyCode::Enter).printable(), None);
    }

    // ── Key descriptions ────────────────────────────────────────────────

    #[test]
    fn parse_plain_char() {
        assert_eq!(KeyEvent::parse("a"), Ok(KeyEvent::char('a')));
    }

    #[test]
    fn parse_ctrl_x() {
        assert_eq!(KeyEvent::parse("ctrl+x"), Ok(KeyEvent::char('x').ctrl()));
        assert_eq!(KeyEvent::parse("Ctrl+X"), Ok(KeyEvent::char('X').ctrl()));
    }

    #[test]
    fn parse_named_keys() {
        assert_eq!(
            KeyEvent::parse("shift+insert"),
            Ok(KeyEvent::plain(KeyCode::Insert).shift())
        );
        assert_eq!(
            KeyEvent::parse("ctrl+space"),
            Ok(KeyEvent::char(' ').ctrl())
        );
        assert_eq!(KeyEvent::parse("f8"), Ok(KeyEvent::plain(KeyCode::F(8))));
        assert_eq!(
            KeyEvent::parse("shift+F8"),
            Ok(KeyEvent::plain(KeyCode::F(8)).shift())
        );
    }

    #[test]
    fn parse_plus_key() {
        assert_eq!(KeyEvent::parse("+"), Ok(KeyEvent::char('+')));
        assert_eq!(KeyEvent::parse("ctrl++"), Ok(KeyEvent::char('+').ctrl()));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(KeyEvent::parse("  "), Err(KeySpecError::Empty));
        assert_eq!(
            KeyEvent::parse("hyper+x"),
            Err(KeySpecError::UnknownModifier("hyper".into()))
        );
        assert_eq!(
            KeyEvent::parse("ctrl+banana"),
            Err(KeySpecError::UnknownKey("banana".into()))
        );
        assert_eq!(
            KeyEvent::parse("f99"),
            Err(KeySpecError::UnknownKey("f99".into()))
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        for spec in ["ctrl+x", "alt+8", "shift+f8", "ctrl+space", "shift+insert"] {
            let key = KeyEvent::parse(spec).unwrap();
            assert_eq!(KeyEvent::parse(&key.to_string()), Ok(key));
        }
    }

    // ── Mouse ───────────────────────────────────────────────────────────

    #[test]
    fn press_starts_as_single_click() {
        let ev = MouseEvent::new(MouseEventKind::Press(MouseButton::Left), 3, 4);
        assert_eq!(ev.clicks, 1);
        assert!(ev.is_press(MouseButton::Left));
        let ev = MouseEvent::new(MouseEventKind::Drag(MouseButton::Left), 3, 4);
        assert_eq!(ev.clicks, 0);
    }

    // ── Click tracking ──────────────────────────────────────────────────

    fn left_press(x: u16, y: u16) -> MouseEvent {
        MouseEvent::new(MouseEventKind::Press(MouseButton::Left), x, y)
    }

    #[test]
    fn clicks_count_up_and_cycle() {
        let mut tracker = ClickTracker::new();
        let t0 = Instant::now();
        let step = Duration::from_millis(100);

        assert_eq!(tracker.track(left_press(5, 1), t0).clicks, 1);
        assert_eq!(tracker.track(left_press(5, 1), t0 + step).clicks, 2);
        assert_eq!(tracker.track(left_press(5, 1), t0 + step * 2).clicks, 3);
        assert_eq!(tracker.track(left_press(5, 1), t0 + step * 3).clicks, 1);
    }

    #[test]
    fn slow_clicks_stay_single() {
        let mut tracker = ClickTracker::new();
        let t0 = Instant::now();
        assert_eq!(tracker.track(left_press(5, 1), t0).clicks, 1);
        let later = t0 + MULTI_CLICK_INTERVAL + Duration::from_millis(1);
        assert_eq!(tracker.track(left_press(5, 1), later).clicks, 1);
    }

    #[test]
    fn moved_click_resets_count() {
        let mut tracker = ClickTracker::new();
        let t0 = Instant::now();
        assert_eq!(tracker.track(left_press(5, 1), t0).clicks, 1);
        assert_eq!(tracker.track(left_press(6, 1), t0).clicks, 1);
    }

    #[test]
    fn releases_carry_no_clicks() {
        let mut tracker = ClickTracker::new();
        let release = MouseEvent::new(MouseEventKind::Release(MouseButton::Left), 0, 0)
            .with_clicks(7);
        assert_eq!(tracker.track(release, Instant::now()).clicks, 0);
    }
}
