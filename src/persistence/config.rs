use super::files::read_file;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// User settings stored in config.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// UI tick interval in milliseconds
    pub tick_ms: u64,
    /// Emoji deadline rings instead of plain glyphs
    pub use_emoji: bool,
    /// Step for the +/- progress keys
    pub progress_step: u8,
    /// Allow at most one running focus session across all tasks
    pub single_session: bool,
    /// Log filter used when RUST_LOG is not set
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_ms: 250,
            use_emoji: true,
            progress_step: 10,
            single_session: true,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Clamp values that would make the app unusable
    fn sanitized(mut self) -> Self {
        self.tick_ms = self.tick_ms.clamp(50, 5_000);
        self.progress_step = self.progress_step.clamp(1, 100);
        self
    }
}

/// Parse config.toml content
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).context("Failed to parse config.toml")?;
    Ok(config.sanitized())
}

/// Load config from a file. A missing file means defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    match read_file(path)? {
        Some(content) => parse_config(&content),
        None => Ok(Config::default()),
    }
}

/// Load config, logging and falling back to defaults when it can't be read
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Config {
    load_config(path).unwrap_or_else(|e| {
        log::warn!("Using default settings: {:#}", e);
        Config::default()
    })
}

/// Save config to a file
pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    crate::persistence::atomic_write(path, &content)
}
