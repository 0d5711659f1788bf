//! # tw-text: Text engine for twidget
//!
//! The editing core shared by single-line fields and multi-line views:
//!
//! - **[`position`]**: `Coordinate` (line, byte offset) and `Span`
//! - **[`word`]**: character classes and word motions
//! - **[`line`]**: `Line`: grapheme-aware editing and screen widths
//! - **[`selection`]**: the None / Shift / Mark selection state machine
//! - **[`history`]**: undo/redo with coalescing and blocks
//! - **[`clipboard`]**: clipboard and primary selection behind a scoped lock
//! - **[`find`]**: plain and regex matchers
//! - **[`buffer`]**: `TextBuffer`, the multi-line document

pub mod buffer;
pub mod clipboard;
pub mod find;
pub mod history;
pub mod line;
pub mod position;
pub mod selection;
pub mod word;

pub use buffer::{DefaultLineFactory, LineFactory, RewrapEvent, TextBuffer};
pub use clipboard::{Clipboard, ClipboardBackend, ClipboardKind, ClipboardLock};
pub use find::{FindError, FindFlags, Finder, PlainFinder, RegexFinder};
pub use history::{Editable, History, UndoKind};
pub use line::{Line, PaintInfo};
pub use position::{Coordinate, Span};
pub use selection::{Selection, SelectionMode};
pub use word::{CharClass, Classifier};
