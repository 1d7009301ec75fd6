//! Tracing subscriber setup for the CLI.
//!
//! Logs go to stderr through a non-blocking writer so stdout stays clean for
//! `list --style json`.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{DEFAULT_LOG_FILTER, LOG_ENV};

/// Filter directives: `LSM_LOG` wins, then `--verbose`, then the default.
pub fn filter(env: Option<&str>, verbose: bool) -> EnvFilter {
    if let Some(directives) = env.filter(|d| !d.trim().is_empty())
        && let Ok(filter) = EnvFilter::try_new(directives)
    {
        return filter;
    }
    EnvFilter::new(if verbose { "debug" } else { DEFAULT_LOG_FILTER })
}

/// Installs the global subscriber. Keep the returned guard alive until exit
/// or buffered lines are lost.
pub fn init(verbose: bool, json: bool) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let env = std::env::var(LOG_ENV).ok();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter(env.as_deref(), verbose))
        .with_writer(writer)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    guard
}
