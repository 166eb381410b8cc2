//! Error types for the CLI.

use std::path::PathBuf;

use thiserror::Error;
use tsbridge::RunError;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error loading the type graph.
    #[error("Failed to load type graph: {0}")]
    Load(#[from] LoadError),

    /// Error loading configuration.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// The generation run failed.
    #[error("Generation failed: {0}")]
    Run(#[from] RunError),

    /// Error writing output files.
    #[error("Failed to write output: {0}")]
    Write(#[from] WriteError),

    /// Validation failed (output out of date).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error loading the type graph.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Graph file does not exist.
    #[error("Graph file not found: {path}")]
    NotFound { path: PathBuf },

    /// IO error reading the graph.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The graph is not valid JSON for the graph model.
    #[error("Invalid graph in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid TOML syntax.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// IO error reading config.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error writing output files.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create an invalid TOML error.
    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// Stale output exits with 2 so scripts can tell it apart from failures.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Validation(_) => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Validation("stale".to_string()).exit_code(), 2);
        let io = std::io::Error::other("boom");
        assert_eq!(CliError::Io(io).exit_code(), 1);
    }

    #[test]
    fn test_run_error_message_is_wrapped() {
        let err = CliError::from(RunError::Incomplete {
            missing: vec!["admin".to_string()],
        });
        assert_eq!(
            err.to_string(),
            "Generation failed: Run finished without results for groups: admin"
        );
    }
}
