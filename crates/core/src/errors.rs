//! Error types and handling
//!
//! The error taxonomy is structured with specific error enums for each domain
//! (configuration, external processes) that are then wrapped in the main
//! GroundworkError enum for unified error handling. Every failure is fatal to
//! the current run; there is no warning tier.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// One or more required external tools could not be resolved.
    ///
    /// Collected before any stage runs so the report names every missing
    /// tool at once instead of failing on the first.
    #[error("Required tools are not available: {}", names.join(", "))]
    ToolsMissing { names: Vec<String> },

    /// The JDK source directory to mirror does not exist
    #[error("No JDK found at {path}")]
    JdkMissing { path: PathBuf },

    /// Configuration file parsing error
    #[error("Failed to parse configuration file: {message}")]
    Parsing { message: String },

    /// Configuration validation error
    #[error("Configuration validation error: {message}")]
    Validation { message: String },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file I/O error
    #[error("Failed to read configuration file")]
    Io(#[from] std::io::Error),
}

/// External process errors
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The program could not be spawned at all
    #[error("Failed to run command: {command}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// The program ran but exited nonzero
    #[error("Command failed with exit code {code}: {command}")]
    Failed { command: String, code: i32 },
}

/// Main error enum wrapping all domain-specific errors
#[derive(Error, Debug)]
pub enum GroundworkError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// External process errors
    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    /// Filesystem operation failed on a specific path
    #[error("Failed to {action} {path}: {source}")]
    PathIo {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    /// Generic I/O error without path context
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stage action failed; carries the stage name for reporting
    #[error("Stage '{stage}' failed: {source}")]
    Stage {
        stage: String,
        #[source]
        source: Box<GroundworkError>,
    },
}

impl GroundworkError {
    /// Wrap this error with the name of the stage it occurred in
    pub fn in_stage(self, stage: &str) -> Self {
        GroundworkError::Stage {
            stage: stage.to_string(),
            source: Box::new(self),
        }
    }

    /// Returns true if this is the fail-fast missing-tools report
    pub fn is_tools_missing(&self) -> bool {
        matches!(
            self,
            GroundworkError::Config(ConfigError::ToolsMissing { .. })
        )
    }
}

/// Build a [`GroundworkError::PathIo`] from a failed filesystem call
pub fn path_io(action: &'static str, path: &std::path::Path, source: std::io::Error) -> GroundworkError {
    GroundworkError::PathIo {
        action,
        path: path.to_path_buf(),
        source,
    }
}

/// Convenience type alias for Results with GroundworkError
pub type Result<T> = std::result::Result<T, GroundworkError>;
