use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Invalid glob pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid regex: {0}")]
    RegexError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("YAML error: {0}")]
    YamlError(String),

    #[error("Directory does not exist: '{}'", .0.display())]
    InvalidDirectory(PathBuf),

    #[error(
        "No <filename>.{interface} or <filename>.{support} files found in any sub-directories within '{}'",
        .root.display()
    )]
    NoCandidateFiles {
        root: PathBuf,
        interface: String,
        support: String,
    },

    #[error("Unable to find query: '{0}'")]
    QueryNotFound(String),

    #[error(
        "Construct opened at {}:{} is never closed by a `')` line",
        .path.display(),
        .line_number
    )]
    MalformedConstruct { path: PathBuf, line_number: usize },

    #[error("Line {line_number} is past the end of {}", .path.display())]
    LineOutOfRange { path: PathBuf, line_number: usize },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PolicyError>;
