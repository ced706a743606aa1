//! Tracing subscriber setup.
//!
//! The interactive dashboard owns the terminal, so its logs go to a file.
//! Headless runs log to stderr and keep stdout for the report.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use color_eyre::eyre::WrapErr;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "crop_dashboard=debug"
    } else {
        "crop_dashboard=info"
    }
}

fn env_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(debug)))
}

/// Appends log lines to `path`. Returns `false` if a subscriber was already
/// installed.
pub fn init_file_tracing(path: &Path, debug: bool) -> color_eyre::eyre::Result<bool> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .wrap_err_with(|| format!("cannot open log file {}", path.display()))?;

    Ok(tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .is_ok())
}

pub fn init_stderr_tracing(debug: bool) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
