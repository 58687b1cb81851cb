//! Configuration for the blt CLI.
//!
//! Settings are resolved once at startup with the following precedence:
//! 1. CLI flags (`--file`, `--date`)
//! 2. Environment variables (BULLETLOG_*)
//! 3. User global config (~/.config/bulletlog/config.yaml)
//! 4. Built-in defaults
//!
//! The result is a [`Settings`] value handed to every command, so nothing
//! below `main` reads the environment.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::header;

/// Log file used when nothing else names one.
pub const DEFAULT_FILE: &str = ".BULLETLOG";

pub const ENV_FILE: &str = "BULLETLOG_FILE";
pub const ENV_DATE: &str = "BULLETLOG_DATE";
pub const ENV_QUIET: &str = "BULLETLOG_QUIET";
pub const ENV_LOG: &str = "BULLETLOG_LOG";

// ============================================================================
// Config Structs
// ============================================================================

/// User configuration file contents.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log file path (relative paths resolve against the working directory)
    pub file: Option<PathBuf>,
    /// Behavior settings
    pub behavior: BehaviorConfig,
}

/// Behavior defaults.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Suppress confirmation messages after mutations
    pub quiet: bool,
}

// ============================================================================
// Config Source Tracking
// ============================================================================

/// Source of a configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Built-in default
    Default,
    /// User global config (~/.config/bulletlog/config.yaml)
    UserGlobal,
    /// Environment variable
    EnvVar(String),
    /// CLI flag
    CliFlag,
    /// Current local date
    Clock,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::UserGlobal => write!(f, "~/.config/bulletlog/config.yaml"),
            ConfigSource::EnvVar(name) => write!(f, "${}", name),
            ConfigSource::CliFlag => write!(f, "CLI flag"),
            ConfigSource::Clock => write!(f, "local clock"),
        }
    }
}

// ============================================================================
// Environment Variable Registry
// ============================================================================

/// Environment variable definition for documentation.
pub struct EnvVar {
    /// Variable name (e.g., "BULLETLOG_FILE")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Default value or behavior
    pub default: &'static str,
    /// Valid values (if enumerable)
    pub values: Option<&'static str>,
}

/// Registry of all supported environment variables.
pub const ENV_VARS: &[EnvVar] = &[
    EnvVar {
        name: ENV_FILE,
        description: "Path to the log file",
        default: DEFAULT_FILE,
        values: Some("path"),
    },
    EnvVar {
        name: ENV_DATE,
        description: "Date to file new entries under instead of today",
        default: "today (local)",
        values: Some("YYYYMMDD"),
    },
    EnvVar {
        name: ENV_QUIET,
        description: "Suppress confirmation messages",
        default: "false",
        values: Some("1, true, yes"),
    },
    EnvVar {
        name: ENV_LOG,
        description: "Diagnostic log filter (env_logger syntax)",
        default: "warn",
        values: Some("error, warn, info, debug, trace"),
    },
    EnvVar {
        name: "NO_COLOR",
        description: "Disable colored output (standard)",
        default: "unset",
        values: Some("any non-empty value"),
    },
];

// ============================================================================
// Environment Variable Helpers
// ============================================================================

/// Parse a boolean setting value.
///
/// Truthy values are 1, true, yes; falsy are 0, false, no. Anything else
/// is `None` and falls through to the next source.
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Parse a string environment variable.
///
/// Returns `Some(value)` if set and non-empty, `None` otherwise.
pub fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

// ============================================================================
// Config Loading
// ============================================================================

/// Get the user config file path (~/.config/bulletlog/config.yaml).
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("bulletlog").join("config.yaml"))
}

/// Load a config file, returning None if it doesn't exist or can't be parsed.
pub fn load_manifest(path: &Path) -> Option<Config> {
    let content = fs::read_to_string(path).ok()?;
    match serde_yaml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            debug!("ignoring {}: {}", path.display(), e);
            None
        }
    }
}

/// Load the user config, falling back to defaults.
pub fn load_config() -> LoadedConfig {
    match user_config_path().and_then(|p| load_manifest(&p)) {
        Some(config) => LoadedConfig {
            config,
            source: ConfigSource::UserGlobal,
        },
        None => LoadedConfig {
            config: Config::default(),
            source: ConfigSource::Default,
        },
    }
}

/// Result of loading configuration with source tracking.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
}

// ============================================================================
// Resolved Settings
// ============================================================================

/// Everything a command needs to locate the log and date new entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub path: PathBuf,
    pub path_source: ConfigSource,
    /// Day new entries are filed under.
    pub date: NaiveDate,
    pub date_source: ConfigSource,
    /// Suppress confirmation messages.
    pub quiet: bool,
    pub quiet_source: ConfigSource,
}

impl Settings {
    /// Resolve settings from flags, the process environment and config.
    pub fn resolve(
        file: Option<PathBuf>,
        date: Option<String>,
        loaded: &LoadedConfig,
    ) -> Result<Self, Error> {
        Self::resolve_with(
            file,
            date,
            loaded,
            env_string,
            Local::now().date_naive(),
        )
    }

    /// Resolution with an injectable environment and clock.
    pub fn resolve_with(
        file: Option<PathBuf>,
        date: Option<String>,
        loaded: &LoadedConfig,
        env: impl Fn(&str) -> Option<String>,
        today: NaiveDate,
    ) -> Result<Self, Error> {
        let (path, path_source) = if let Some(path) = file {
            (path, ConfigSource::CliFlag)
        } else if let Some(path) = env(ENV_FILE) {
            (PathBuf::from(path), ConfigSource::EnvVar(ENV_FILE.to_string()))
        } else if let Some(path) = &loaded.config.file {
            (path.clone(), loaded.source.clone())
        } else {
            (PathBuf::from(DEFAULT_FILE), ConfigSource::Default)
        };

        let (raw, date_source) = match date {
            Some(d) => (Some(d), ConfigSource::CliFlag),
            None => match env(ENV_DATE) {
                Some(d) => (Some(d), ConfigSource::EnvVar(ENV_DATE.to_string())),
                None => (None, ConfigSource::Clock),
            },
        };
        let date = match raw {
            Some(input) => {
                header::parse_date(input.trim()).ok_or(Error::InvalidDate { input })?
            }
            None => today,
        };

        let (quiet, quiet_source) = match env(ENV_QUIET).as_deref().and_then(parse_bool) {
            Some(q) => (q, ConfigSource::EnvVar(ENV_QUIET.to_string())),
            None if loaded.config.behavior.quiet => (true, loaded.source.clone()),
            None => (false, ConfigSource::Default),
        };

        Ok(Self {
            path,
            path_source,
            date,
            date_source,
            quiet,
            quiet_source,
        })
    }
}
