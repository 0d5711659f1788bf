// SPDX-License-Identifier: MIT
//
// twidget: a text-mode widget toolkit.
//
// The facade wires the member crates together:
//
//   tw-term    → windows, cells, key/mouse events, signals
//   tw-text    → grapheme-aware line editing, selection, undo, clipboard
//   tw-widgets → text field, drop-down completion, text view, dialog,
//                split panes, buttons
//
// and owns the process-level lifecycle. `Toolkit::init` loads settings and
// key bindings into a shared `Context`, installs the tracing subscriber,
// and `Toolkit::shutdown` clears the clipboards on the way out:
//
//   let toolkit = Toolkit::init(Config::load("twidget.toml")?)?;
//   let field = TextField::new(toolkit.context(), 20);
//   ...
//   toolkit.shutdown();

pub mod config;
pub mod logging;

pub use tw_term;
pub use tw_text;
pub use tw_widgets;

pub use config::{Config, ConfigError, LogConfig};
pub use logging::LoggingError;
pub use tw_term::{Event, KeyCode, KeyEvent, MouseEvent, Rect, Window};
pub use tw_text::TextBuffer;
pub use tw_widgets::{
    Button, Checkbox, Context, Dialog, EventResult, Orientation, Split, TextField, TextView,
    Widget,
};

use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    Find(#[from] tw_text::FindError),
    #[error(transparent)]
    KeySpec(#[from] tw_term::KeySpecError),
}

/// The initialised toolkit: configuration plus the shared widget context.
#[derive(Debug)]
pub struct Toolkit {
    config: Config,
    context: Context,
}

impl Toolkit {
    /// Install logging and build the shared context.
    ///
    /// A subscriber that is already installed (by the host application or
    /// an earlier `init`) is kept.
    ///
    /// # Errors
    ///
    /// Invalid key bindings, a bad log filter, or an unusable log file.
    pub fn init(config: Config) -> Result<Self, Error> {
        match logging::init_logging(&config.log) {
            Ok(()) | Err(LoggingError::InitSubscriber { .. }) => {}
            Err(e) => return Err(e.into()),
        }
        let toolkit = Self::without_logging(config)?;
        info!(target: "tw", "toolkit initialised");
        Ok(toolkit)
    }

    /// Build the context and leave the global subscriber alone.
    ///
    /// # Errors
    ///
    /// Invalid key bindings.
    pub fn without_logging(config: Config) -> Result<Self, Error> {
        let bindings = config.key_bindings()?;
        let context = Context::new(config.settings(), bindings);
        debug!(target: "tw", settings = ?context.settings, "context ready");
        Ok(Self { config, context })
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Clone this into every widget of one tree; clones share the clipboard.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.context
    }

    /// Drop clipboard contents and end the session.
    pub fn shutdown(self) {
        self.context.clipboard.set_clipboard(None);
        self.context.clipboard.set_primary(None);
        info!(target: "tw", "toolkit shut down");
    }
}
