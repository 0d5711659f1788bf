// SPDX-License-Identifier: MIT
//
// Cell: one character position in a window.
//
// A cell holds a character and the style it is drawn with. Styles are
// combined in two layers: a widget supplies a base style (say, "dialog
// text") and then overrides parts of it for emphasis (say, "selected").
// `Style::combine` is that layering: attribute flags accumulate, colours in
// the override win when they are set.
//
// Wide characters occupy two columns. The first cell holds the character;
// the second is a continuation cell (`ch == '\0'`) carrying the same style.

// ─── Text Attributes ─────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Text attributes stored as a compact bitfield.
    ///
    /// ```
    /// use tw_term::cell::Attr;
    ///
    /// let style = Attr::BOLD | Attr::REVERSE;
    /// assert!(style.contains(Attr::BOLD));
    /// assert!(!style.contains(Attr::DIM));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        const BOLD      = 1 << 0;
        const DIM       = 1 << 1;
        const ITALIC    = 1 << 2;
        const UNDERLINE = 1 << 3;
        const BLINK     = 1 << 4;
        /// Swap foreground and background. Selections use this.
        const REVERSE   = 1 << 5;
        const HIDDEN    = 1 << 6;
        const STRIKE    = 1 << 7;
    }
}

// ─── Style ───────────────────────────────────────────────────────────────────

/// A palette colour. Resolution to actual terminal colours happens in the
/// backend; the toolkit only passes indices through.
pub type ColorIndex = u8;

/// Attributes plus optional colours. `None` means "inherit".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    pub attr: Attr,
    pub fg: Option<ColorIndex>,
    pub bg: Option<ColorIndex>,
}

impl Style {
    /// The empty style: no attributes, inherited colours.
    pub const PLAIN: Self = Self {
        attr: Attr::empty(),
        fg: None,
        bg: None,
    };

    #[inline]
    #[must_use]
    pub const fn attr(attr: Attr) -> Self {
        Self {
            attr,
            fg: None,
            bg: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: ColorIndex) -> Self {
        self.fg = Some(fg);
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: ColorIndex) -> Self {
        self.bg = Some(bg);
        self
    }

    /// Layer `over` on top of `self`: flags are unioned, colours set in
    /// `over` replace the base colours.
    #[must_use]
    pub const fn combine(self, over: Self) -> Self {
        Self {
            attr: self.attr.union(over.attr),
            fg: match over.fg {
                Some(c) => Some(c),
                None => self.fg,
            },
            bg: match over.bg {
                Some(c) => Some(c),
                None => self.bg,
            },
        }
    }
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// A single window cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// The character, or `'\0'` for the right half of a wide character.
    pub ch: char,
    pub style: Style,
}

impl Cell {
    /// A blank cell: a space with no style.
    pub const BLANK: Self = Self {
        ch: ' ',
        style: Style::PLAIN,
    };

    #[inline]
    #[must_use]
    pub const fn new(ch: char, style: Style) -> Self {
        Self { ch, style }
    }

    /// Whether this is the right half of a wide character.
    #[inline]
    #[must_use]
    pub const fn is_continuation(&self) -> bool {
        self.ch == '\0'
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
