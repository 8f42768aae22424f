use crate::persistence::log_file;
use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use std::fs::OpenOptions;
use std::path::Path;

/// Log to quadrant.log in the data directory (stderr belongs to the TUI).
/// RUST_LOG overrides `default_level`.
pub fn init_file_logging(data_dir: &Path, default_level: &str) -> Result<()> {
    let path = log_file(data_dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    Builder::from_env(Env::default().default_filter_or(default_level))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_secs()
        .try_init()
        .context("Logger already initialized")?;

    Ok(())
}

/// Log to stderr, for the non-interactive subcommands
pub fn init_stderr_logging(default_level: &str) {
    let _ = Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();
}
