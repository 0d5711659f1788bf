// SPDX-License-Identifier: MIT
//
// Subscriber setup for the toolkit's tracing events.
//
// The library crates only emit events under `tw.*` targets. This module
// installs the global `fmt` subscriber: the filter comes from `TWIDGET_LOG`
// when set and from `[log] level` otherwise, and output goes to the
// configured file or to stderr.

use std::ffi::OsStr;
use std::path::Path;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Environment variable overriding the configured filter.
pub const LOG_ENV: &str = "TWIDGET_LOG";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("create log directory {} failed", path.display())]
    CreateLogDir {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid log filter `{directive}`")]
    Filter {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("initialize tracing subscriber failed")]
    InitSubscriber {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Build the filter: `TWIDGET_LOG` wins over `level`.
///
/// # Errors
///
/// [`LoggingError::Filter`] for an unparsable directive.
pub fn env_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    let directive = std::env::var(LOG_ENV).unwrap_or_else(|_| level.to_string());
    EnvFilter::try_new(&directive).map_err(|source| LoggingError::Filter { directive, source })
}

/// Install the global subscriber.
///
/// # Errors
///
/// A bad filter, an uncreatable log directory, or a subscriber that is
/// already installed ([`LoggingError::InitSubscriber`]).
pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    let filter = env_filter(&config.level)?;

    let result = match &config.file {
        Some(file) => {
            let dir = file
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateLogDir {
                path: dir.to_path_buf(),
                source,
            })?;
            let name = file.file_name().unwrap_or_else(|| OsStr::new("twidget.log"));
            let appender = tracing_appender::rolling::never(dir, name);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true)
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init(),
    };
    result.map_err(|source| LoggingError::InitSubscriber { source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_directive() {
        // Only meaningful when the override is unset.
        if std::env::var(LOG_ENV).is_err() {
            assert!(matches!(
                env_filter("tw=notalevel"),
                Err(LoggingError::Filter { .. })
            ));
        }
    }

    #[test]
    fn accepts_target_directives() {
        if std::env::var(LOG_ENV).is_err() {
            assert!(env_filter("info,tw.widgets.split=trace").is_ok());
        }
    }
}
