//! Error types for fixture model generation.

use thiserror::Error;

/// Exit code for configuration and request parsing failures.
pub const EXIT_CONFIG_ERROR: u8 = 1;

/// Exit code for file system failures.
pub const EXIT_IO_ERROR: u8 = 7;

/// Main error type for a generation request.
///
/// Only configuration problems are fatal. A SQL type that cannot be mapped is
/// recorded as a [`Diagnostic`](crate::diagnostics::Diagnostic) instead.
#[derive(Error, Debug)]
pub enum GenError {
    /// Invalid options document (missing package, malformed override, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Engine identifier outside the supported set
    #[error("Unsupported SQL engine: {0}")]
    UnknownEngine(String),

    /// `sql_package` value outside the supported set
    #[error("Unknown SQL package: {0}")]
    UnknownSqlPackage(String),

    /// Override pattern that does not compile
    #[error("Invalid override pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// IO error (reading request files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl GenError {
    /// Create a Config error.
    pub fn config(message: impl Into<String>) -> Self {
        GenError::Config(message.into())
    }

    /// Create a Pattern error for the given source pattern.
    pub fn pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        GenError::Pattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            GenError::Io(_) => EXIT_IO_ERROR,
            _ => EXIT_CONFIG_ERROR,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for generation operations.
pub type Result<T> = std::result::Result<T, GenError>;
