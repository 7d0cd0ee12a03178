//! # snoop-config
//!
//! Configuration management for snooplib.
//!
//! Loads configuration from:
//! 1. `~/.snooplib/config.toml` (global)
//! 2. `.snooplib/config.toml` (project-local, overrides global)
//! 3. Environment variables (highest priority)

pub mod logging;
pub mod sink;
pub mod testing;

pub use logging::LogLevel;
pub use sink::{dump_recorder, write_dump, DumpReport, DumpTarget, SinkError, Streams};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Dump destination file. Unset means stdout with markers.
pub const ENV_OUTPUT_PATH: &str = "SNOOPLIB_OUTPUT_PATH";
/// `1`/`true` appends to the destination file instead of truncating it.
pub const ENV_OUTPUT_APPEND: &str = "SNOOPLIB_OUTPUT_APPEND";
/// Log level for the preloaded layer; unset keeps the layer silent.
pub const ENV_LOG: &str = "SNOOPLIB_LOG";
/// Explicit path to the preload library, used by the CLI.
pub const ENV_LIBRARY: &str = "SNOOPLIB_LIBRARY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub log: LogConfig,
}

/// Where the dump goes at process exit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Destination file; `None` writes to stdout between markers
    pub path: Option<PathBuf>,
    /// Append instead of truncate
    pub append: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Layer log level; `None` disables layer logging
    pub level: Option<LogLevel>,
}

/// Resolved dump destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    File { path: PathBuf, append: bool },
    Stdout,
}

impl Config {
    /// Load config from standard locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(
            Self::global_config_path().as_deref(),
            Path::new(".snooplib/config.toml"),
            |key| std::env::var(key).ok(),
        )
    }

    /// Load from explicit locations with a custom environment lookup.
    pub fn load_from<F>(global: Option<&Path>, project: &Path, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        // 1. Global config
        if let Some(global_path) = global {
            if global_path.exists() {
                crate::log_config_debug!(
                    "Loading global config",
                    path = tracing::field::display(global_path.display())
                );
                let contents = std::fs::read_to_string(global_path)?;
                config = toml::from_str(&contents)?;
            }
        }

        // 2. Project config - overrides global
        if project.exists() {
            crate::log_config_debug!(
                "Loading project config",
                path = tracing::field::display(project.display())
            );
            let contents = std::fs::read_to_string(project)?;
            let project_config: Config = toml::from_str(&contents)?;
            config.merge(project_config);
        }

        // 3. Environment variable overrides
        config.apply_env_overrides(env);

        Ok(config)
    }

    /// Environment only, for when the config files are unreadable.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Global config path: ~/.snooplib/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".snooplib/config.toml"))
    }

    fn merge(&mut self, other: Config) {
        if other.output.path.is_some() {
            self.output.path = other.output.path;
        }
        if other.output.append.is_some() {
            self.output.append = other.output.append;
        }
        if other.log.level.is_some() {
            self.log.level = other.log.level;
        }
    }

    fn apply_env_overrides<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // An empty value is still a destination; opening it fails and is reported.
        if let Some(path) = env(ENV_OUTPUT_PATH) {
            self.output.path = Some(PathBuf::from(path));
        }
        if let Some(append) = env(ENV_OUTPUT_APPEND) {
            self.output.append = Some(parse_flag(&append));
        }
        if let Some(level) = env(ENV_LOG) {
            match level.parse() {
                Ok(level) => self.log.level = Some(level),
                Err(e) => crate::log_config_debug!(
                    "Ignoring SNOOPLIB_LOG",
                    error = tracing::field::display(&e)
                ),
            }
        }
    }

    pub fn destination(&self) -> Destination {
        match &self.output.path {
            Some(path) => Destination::File {
                path: path.clone(),
                append: self.output.append.unwrap_or(false),
            },
            None => Destination::Stdout,
        }
    }

    /// Environment for a child process that should load the layer with this config.
    pub fn layer_env(&self) -> Vec<(String, String)> {
        let mut vars = Vec::new();
        if let Some(path) = &self.output.path {
            vars.push((ENV_OUTPUT_PATH.to_string(), path.display().to_string()));
        }
        if self.output.append == Some(true) {
            vars.push((ENV_OUTPUT_APPEND.to_string(), "1".to_string()));
        }
        if let Some(level) = self.log.level {
            vars.push((ENV_LOG.to_string(), level.as_filter().to_string()));
        }
        vars
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
