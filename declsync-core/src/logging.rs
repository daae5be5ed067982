//! Shared logging setup for declsync binaries.
//!
//! The library itself only emits `tracing` events; installing a subscriber is
//! left to whoever embeds it.

use crate::error::{ConvertError, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a directive that overrides the CLI flags.
pub const LOG_ENV: &str = "DECLSYNC_LOG";

/// Maps CLI verbosity flags to a maximum log level.
///
/// `quiet` wins over any verbosity; otherwise 0=INFO, 1=DEBUG, 2+=TRACE.
pub const fn level_for(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Builds the event filter: `DECLSYNC_LOG` when set and valid, the flag level otherwise.
pub fn filter_for(verbose: u8, quiet: bool, directive: Option<&str>) -> EnvFilter {
    let fallback = || EnvFilter::new(level_for(verbose, quiet).as_str());
    match directive {
        Some(directive) if !directive.trim().is_empty() => {
            EnvFilter::try_new(directive).unwrap_or_else(|_| fallback())
        }
        _ => fallback(),
    }
}

/// Initializes structured logging on stderr based on verbosity level.
///
/// # Errors
/// Returns [`ConvertError::Configuration`] if a global subscriber is already set.
///
/// # Example
/// ```rust,no_run
/// declsync_core::logging::init_logging(1, false)?;
/// # Ok::<(), declsync_core::ConvertError>(())
/// ```
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    let directive = std::env::var(LOG_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbose, quiet, directive.as_deref()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| ConvertError::configuration(format!("logging already initialized: {err}")))
}
