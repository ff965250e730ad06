//! Error types for the categorize-and-merge pipeline.
//!
//! One error type per layer:
//!
//! - [`ConfigError`] - configuration loading and validation (always fatal)
//! - [`CsvError`] - reading and parsing an input source
//! - [`OutputError`] - rendering the organized result
//! - [`OrganizeError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Row-level problems (an unrecognized column, a date no format parses, a
//! source that yields no rows) are not errors: they are logged and the batch
//! continues.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors raised while building an [`crate::OrganizerConfig`].
///
/// These abort before any row is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `defaultCategoryName` missing or empty.
    #[error("defaultCategoryName must be a non-empty string")]
    MissingDefaultCategory,

    /// A category regex failed to compile.
    #[error("invalid regex '{pattern}' for category '{category}' on column '{column}': {source}")]
    InvalidPattern {
        category: String,
        column: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A date transformer format is unusable.
    #[error("invalid date format '{format}' for column '{column}': {reason}")]
    InvalidDateFormat {
        column: String,
        format: String,
        reason: String,
    },

    /// The document parsed but its shape is wrong.
    #[error("malformed configuration: {0}")]
    Malformed(String),

    /// Failed to read the configuration file.
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML syntax or type error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON syntax or type error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors while reading one input source.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid CSV content.
    #[error("invalid CSV: {0}")]
    Parse(#[from] csv::Error),

    /// Empty input.
    #[error("CSV input is empty")]
    EmptyFile,

    /// Header line present but without any column.
    #[error("no headers found in CSV")]
    NoHeaders,

    /// The csv reader only supports single-byte delimiters.
    #[error("delimiter '{0}' is not a single ASCII character")]
    InvalidDelimiter(char),
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors while rendering organized categories.
#[derive(Debug, Error)]
pub enum OutputError {
    /// CSV writer failure.
    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failure.
    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    /// Rendered bytes were not UTF-8.
    #[error("output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

// =============================================================================
// Organize Errors (top-level)
// =============================================================================

/// Top-level errors returned by the file pipeline and the CLI.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An input source could not be read. Fatal for the whole batch.
    #[error("input {}: {source}", path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: CsvError,
    },

    /// Output rendering error.
    #[error("output error: {0}")]
    Output(#[from] OutputError),

    /// Failed to write the result.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for output operations.
pub type OutputResult<T> = Result<T, OutputError>;

/// Result type for pipeline operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // ConfigError -> OrganizeError
        let config_err = ConfigError::MissingDefaultCategory;
        let organize_err: OrganizeError = config_err.into();
        assert!(organize_err.to_string().contains("defaultCategoryName"));

        // OutputError -> OrganizeError
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let organize_err: OrganizeError = OutputError::from(source).into();
        assert!(organize_err.to_string().contains("JSON output error"));
    }

    #[test]
    fn test_invalid_pattern_names_offender() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = ConfigError::InvalidPattern {
            category: "Groceries".into(),
            column: "Description".into(),
            pattern: "(unclosed".into(),
            source,
        };
        let msg = err.to_string();
        assert!(msg.contains("(unclosed"));
        assert!(msg.contains("Groceries"));
        assert!(msg.contains("Description"));
    }

    #[test]
    fn test_source_error_names_path() {
        let err = OrganizeError::Source {
            path: PathBuf::from("statements/march.csv"),
            source: CsvError::NoHeaders,
        };
        let msg = err.to_string();
        assert!(msg.contains("march.csv"));
        assert!(msg.contains("no headers"));
    }
}
