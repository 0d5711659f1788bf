//! Static text with an optional underlined hotkey.
//!
//! `_` in the source text marks the next character as the hotkey:
//! `"_Reverse video"` shows `Reverse video` with `R` underlined and answers
//! to Alt+R. Labels never take focus; pass [`Label::hotkey`] to the widget
//! the label describes so the dialog can jump there.

use std::any::Any;

use tw_term::{KeyEvent, MouseEvent, Style, Surface, string_width};

use crate::context::Styles;
use crate::widget::{EventResult, Widget, WidgetBase};

/// Label text split into display text and hotkey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyText {
    text: String,
    /// Byte offset into `text` and the lowercased key.
    hotkey: Option<(usize, char)>,
}

impl HotkeyText {
    /// Parse `_`-marked text. Only the first marker counts; a trailing `_`
    /// is kept literally.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let mut text = String::with_capacity(source.len());
        let mut hotkey = None;
        let mut chars = source.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch == '_' && hotkey.is_none() {
                if let Some(&next) = chars.peek() {
                    hotkey = next.to_lowercase().next().map(|k| (text.len(), k));
                    continue;
                }
            }
            text.push(ch);
        }
        Self { text, hotkey }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn hotkey(&self) -> Option<char> {
        self.hotkey.map(|(_, k)| k)
    }

    /// Case-insensitive hotkey match.
    #[must_use]
    pub fn matches(&self, ch: char) -> bool {
        self.hotkey()
            .is_some_and(|k| ch.to_lowercase().eq(std::iter::once(k)))
    }

    /// Display width in columns.
    #[must_use]
    pub fn width(&self) -> usize {
        string_width(&self.text)
    }

    /// Paint at the surface's paint cursor, underlining the hotkey.
    pub fn paint(&self, surface: &mut impl Surface, normal: Style, styles: &Styles) {
        for (i, ch) in self.text.char_indices() {
            let style = match self.hotkey {
                Some((at, _)) if at == i => normal.combine(styles.hotkey),
                _ => normal,
            };
            surface.addch(ch, style);
        }
    }
}

/// A non-focusable text widget.
#[derive(Debug)]
pub struct Label {
    base: WidgetBase,
    text: HotkeyText,
    styles: Styles,
}

impl Label {
    /// A label sized to its text.
    #[must_use]
    pub fn new(text: &str, styles: Styles) -> Self {
        let text = HotkeyText::parse(text);
        let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
        Self {
            base: WidgetBase::new(width, 1),
            text,
            styles,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        self.text.text()
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = HotkeyText::parse(text);
        self.base.force_redraw();
    }

    #[must_use]
    pub fn hotkey(&self) -> Option<char> {
        self.text.hotkey()
    }
}

impl Widget for Label {
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

    fn process_mouse_event(&mut self, _event: MouseEvent) -> bool {
        false
    }

    fn accepts_focus(&self) -> bool {
        false
    }

    fn update_contents(&mut self) {
        if !self.base.take_redraw() {
            return;
        }
        let win = &mut self.base.window;
        win.set_paint(0, 0);
        win.clrtoeol();
        self.text.paint(win, self.styles.normal, &self.styles);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tw_term::Attr;

    use super::*;

    #[test]
    fn parse_marks_hotkey() {
        let t = HotkeyText::parse("_Reverse video");
        assert_eq!(t.text(), "Reverse video");
        assert_eq!(t.hotkey(), Some('r'));
        assert!(t.matches('R'));
        assert!(!t.matches('v'));

        let t = HotkeyText::parse("Bl_ink");
        assert_eq!(t.text(), "Blink");
        assert_eq!(t.hotkey(), Some('i'));
    }

    #[test]
    fn parse_without_marker() {
        let t = HotkeyText::parse("plain_");
        assert_eq!(t.text(), "plain_");
        assert_eq!(t.hotkey(), None);
    }

    #[test]
    fn label_paints_underlined_hotkey() {
        let mut label = Label::new("B_old", Styles::default());
        assert!(!label.accepts_focus());
        label.update_contents();
        assert_eq!(label.window().row_text(0), "Bold");
        let cell = label.window().cell(1, 0).unwrap();
        assert!(cell.style.attr.contains(Attr::UNDERLINE));
    }
}
