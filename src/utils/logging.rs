//! Diagnostic logging setup.
//!
//! The TUI owns stdout and stderr while it runs, so tracing output only goes
//! to a file named on the command line. Without one, no subscriber is
//! installed and `tracing` macros are no-ops.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_DIRECTIVE: &str = "parley=info";

/// Build the filter from `RUST_LOG`, falling back to [`DEFAULT_LOG_DIRECTIVE`].
pub fn env_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose {
        "parley=debug"
    } else {
        DEFAULT_LOG_DIRECTIVE
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install a global subscriber that appends to `path`.
pub fn init_file_logging(path: &Path, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| err as Box<dyn std::error::Error>)?;

    Ok(())
}

/// Install a subscriber writing to stderr. Only used by non-interactive
/// commands, where the terminal is not in raw mode.
pub fn init_stderr_logging(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .try_init();
}
