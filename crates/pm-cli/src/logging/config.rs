//! Logging configuration.
//!
//! Level and format come from, in increasing precedence:
//! - `RUST_LOG` (coarse level only)
//! - `PM_LOG`, `PM_LOG_FORMAT` and `PM_LOG_TIMESTAMPS`
//! - CLI flags (`-v`, `-q`, `--log-format`)

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Environment variable holding the log level.
pub const ENV_LOG_LEVEL: &str = "PM_LOG";

/// Environment variable holding the log format.
pub const ENV_LOG_FORMAT: &str = "PM_LOG_FORMAT";

/// Set to `0`, `false` or `off` to drop timestamps from human output.
pub const ENV_LOG_TIMESTAMPS: &str = "PM_LOG_TIMESTAMPS";

/// Where stderr logging goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per line.
    Jsonl,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" | "text" => Ok(LogFormat::Human),
            "jsonl" | "json" => Ok(LogFormat::Jsonl),
            other => Err(format!("unknown log format '{}' (expected human or jsonl)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    const NAMED: [(LogLevel, &'static str); 6] = [
        (LogLevel::Trace, "trace"),
        (LogLevel::Debug, "debug"),
        (LogLevel::Info, "info"),
        (LogLevel::Warn, "warn"),
        (LogLevel::Error, "error"),
        (LogLevel::Off, "off"),
    ];

    pub fn as_str(self) -> &'static str {
        Self::NAMED
            .iter()
            .find(|(level, _)| *level == self)
            .map_or("info", |(_, name)| *name)
    }

    /// Level selected by the `-v` count; `--quiet` wins and means errors only.
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Option<Self> {
        match (quiet, verbose) {
            (true, _) => Some(LogLevel::Error),
            (false, 0) => None,
            (false, 1) => Some(LogLevel::Debug),
            (false, _) => Some(LogLevel::Trace),
        }
    }

    /// Most verbose level named anywhere in a `RUST_LOG` directive string.
    fn from_directives(directives: &str) -> Option<Self> {
        let lowered = directives.to_ascii_lowercase();
        Self::NAMED
            .iter()
            .filter(|(level, _)| *level != LogLevel::Off)
            .find(|(_, name)| lowered.contains(name))
            .map(|(level, _)| *level)
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        let name = match lowered.as_str() {
            "warning" => "warn",
            "none" | "quiet" => "off",
            other => other,
        };
        Self::NAMED
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(level, _)| *level)
            .ok_or_else(|| format!("unknown log level '{}'", s))
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effective logging settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Timestamps on human output lines.
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: LogLevel::Info,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Resolve from the process environment, then apply CLI flags.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), cli_level, cli_format)
    }

    /// Resolve from an arbitrary variable lookup. Unparseable values are ignored.
    pub fn from_lookup<F>(lookup: F, cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_level = match lookup(ENV_LOG_LEVEL) {
            Some(val) => val.parse().ok(),
            None => lookup("RUST_LOG").as_deref().and_then(LogLevel::from_directives),
        };
        let env_format = lookup(ENV_LOG_FORMAT).and_then(|val| val.parse().ok());
        let timestamps = lookup(ENV_LOG_TIMESTAMPS)
            .map(|val| !matches!(val.trim().to_ascii_lowercase().as_str(), "0" | "false" | "off" | "no"))
            .unwrap_or(true);

        let defaults = LogConfig::default();
        LogConfig {
            level: cli_level.or(env_level).unwrap_or(defaults.level),
            format: cli_format.or(env_format).unwrap_or(defaults.format),
            timestamps,
        }
    }
}
