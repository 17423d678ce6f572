use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{PolicyError, Result};

pub const DEFAULT_INTERFACE_EXTENSION: &str = "if";
pub const DEFAULT_SUPPORT_EXTENSION: &str = "spt";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Extension of interface files, searched first (default: if)
    #[serde(default = "default_interface_extension")]
    pub interface_extension: String,

    /// Extension of support files, searched after every interface file (default: spt)
    #[serde(default = "default_support_extension")]
    pub support_extension: String,

    /// How the query is placed into the declaration pattern
    #[serde(default)]
    pub query_mode: QueryMode,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `Literal` escapes the query before it is compiled; `Regex` splices it in
/// untouched, so `net_.*_unix` style lookups work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    #[default]
    Literal,
    Regex,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON structured logging
    #[serde(default)]
    pub json: bool,
}

impl SearchConfig {
    /// Load config from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PolicyError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| PolicyError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: SearchConfig = serde_yaml::from_str(&content)
            .map_err(|e| PolicyError::YamlError(format!("Invalid YAML: {}", e)))?;

        config.validated()
    }

    /// Defaults overlaid with `SEPOLQ_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values returned by `lookup` for the `SEPOLQ_*` keys
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ext) = lookup("SEPOLQ_INTERFACE_EXT") {
            self.interface_extension = ext;
        }
        if let Some(ext) = lookup("SEPOLQ_SUPPORT_EXT") {
            self.support_extension = ext;
        }
        if let Some(mode) = lookup("SEPOLQ_QUERY_MODE") {
            self.query_mode = mode.parse()?;
        }
        if let Some(level) = lookup("SEPOLQ_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = lookup("SEPOLQ_LOG_JSON") {
            self.logging.json = json == "true" || json == "1";
        }

        self.validated()
    }

    /// Strip a leading dot from each extension and reject ones that would
    /// break the file glob.
    fn validated(mut self) -> Result<Self> {
        self.interface_extension = normalize_extension(&self.interface_extension)?;
        self.support_extension = normalize_extension(&self.support_extension)?;

        self.logging.level = self.logging.level.trim().to_ascii_lowercase();
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" | "off" => Ok(self),
            other => Err(PolicyError::ConfigError(format!(
                "Unknown log level '{}'",
                other
            ))),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            interface_extension: default_interface_extension(),
            support_extension: default_support_extension(),
            query_mode: QueryMode::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            json: false,
        }
    }
}

impl FromStr for QueryMode {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "literal" => Ok(QueryMode::Literal),
            "regex" => Ok(QueryMode::Regex),
            other => Err(PolicyError::ConfigError(format!(
                "Unknown query mode '{}' (expected literal or regex)",
                other
            ))),
        }
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryMode::Literal => f.write_str("literal"),
            QueryMode::Regex => f.write_str("regex"),
        }
    }
}

fn normalize_extension(ext: &str) -> Result<String> {
    let ext = ext.trim().trim_start_matches('.');
    if ext.is_empty() {
        return Err(PolicyError::ConfigError(
            "File extension must not be empty".to_string(),
        ));
    }
    if ext
        .chars()
        .any(|c| matches!(c, '/' | '\\' | '*' | '?' | '[' | ']' | '{' | '}'))
    {
        return Err(PolicyError::ConfigError(format!(
            "File extension '{}' contains path or glob characters",
            ext
        )));
    }
    Ok(ext.to_string())
}

// Defaults
fn default_interface_extension() -> String {
    DEFAULT_INTERFACE_EXTENSION.to_string()
}

fn default_support_extension() -> String {
    DEFAULT_SUPPORT_EXTENSION.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}
