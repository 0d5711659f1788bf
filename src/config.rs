// SPDX-License-Identifier: MIT
//
// Toolkit configuration, read from TOML.
//
// Every section and every field is optional. Missing values take the
// defaults below, unknown fields are ignored so older binaries can read
// newer files.
//
//   [editing]     tabsize, tab_spaces, undo_limit
//   [text_field]  select_on_focus
//   [log]         level (EnvFilter directive), file
//   [keys]        action = "key" or ["key", "key"]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use tw_term::KeySpecError;
use tw_widgets::{Action, KeyBindings, Settings};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {} failed", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config failed")]
    Parse(#[from] toml::de::Error),
    #[error("unknown action `{0}` in [keys]")]
    UnknownAction(String),
    #[error("invalid key for action `{action}`")]
    InvalidKey {
        action: String,
        #[source]
        source: KeySpecError,
    },
}

// ─── Sections ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditingConfig {
    pub tabsize: usize,
    pub tab_spaces: bool,
    /// 0 keeps every undo step.
    pub undo_limit: usize,
}

impl Default for EditingConfig {
    fn default() -> Self {
        let s = Settings::default();
        Self {
            tabsize: s.tabsize,
            tab_spaces: s.tab_spaces,
            undo_limit: s.undo_limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TextFieldConfig {
    pub select_on_focus: bool,
}

impl Default for TextFieldConfig {
    fn default() -> Self {
        Self {
            select_on_focus: Settings::default().select_on_focus,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `TWIDGET_LOG` is unset.
    pub level: String,
    /// Log to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// One key description or several.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum KeySpecs {
    One(String),
    Many(Vec<String>),
}

impl KeySpecs {
    fn as_slice(&self) -> Vec<&str> {
        match self {
            Self::One(s) => vec![s.as_str()],
            Self::Many(v) => v.iter().map(String::as_str).collect(),
        }
    }
}

// ─── Config ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub editing: EditingConfig,
    pub text_field: TextFieldConfig,
    pub log: LogConfig,
    /// Action name to key description(s). Replaces the action's default keys.
    pub keys: BTreeMap<String, KeySpecs>,
}

impl Config {
    /// Read and validate a config file.
    ///
    /// # Errors
    ///
    /// I/O and parse failures, unknown action names and unparsable keys.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(target: "tw.config", path = %path.display(), "loading config");
        Self::from_toml_str(&text)
    }

    /// Parse and validate TOML text.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`], minus I/O.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.key_bindings()?;
        Ok(config)
    }

    #[must_use]
    pub fn settings(&self) -> Settings {
        Settings {
            tabsize: self.editing.tabsize,
            tab_spaces: self.editing.tab_spaces,
            undo_limit: self.editing.undo_limit,
            select_on_focus: self.text_field.select_on_focus,
        }
    }

    /// The default bindings with `[keys]` applied.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownAction`] or [`ConfigError::InvalidKey`].
    pub fn key_bindings(&self) -> Result<KeyBindings, ConfigError> {
        let mut bindings = KeyBindings::defaults();
        for (name, specs) in &self.keys {
            let action =
                Action::from_name(name).ok_or_else(|| ConfigError::UnknownAction(name.clone()))?;
            bindings
                .rebind(action, &specs.as_slice())
                .map_err(|source| ConfigError::InvalidKey {
                    action: name.clone(),
                    source,
                })?;
        }
        Ok(bindings)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
