//! Error types for the SECURE 2.0 preflight engine.
//!
//! Findings are never errors. Everything in this module aborts a run:
//! a broken configuration, an unreadable input file, or the first payroll
//! row that fails validation.

use thiserror::Error;

/// Process exit code reported for any error (and for a RED verdict).
pub const ERROR_EXIT_CODE: i32 = 2;

/// The main error type for the preflight engine.
///
/// # Example
///
/// ```
/// use secure_preflight::error::PreflightError;
///
/// let error = PreflightError::InvalidRecord {
///     row: 3,
///     field: "gross_pay".to_string(),
///     message: "must be non-negative".to_string(),
/// };
/// assert_eq!(error.to_string(), "Row 3: gross_pay must be non-negative");
/// ```
#[derive(Debug, Error)]
pub enum PreflightError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration key is missing or outside its valid range.
    #[error("Invalid configuration '{field}': {message}")]
    InvalidConfig {
        /// The dotted configuration key.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// An input file (payroll or hours) was not found.
    #[error("Input file not found: {path}")]
    InputNotFound {
        /// The path that was not found.
        path: String,
    },

    /// An input file could not be read as CSV.
    #[error("Failed to read input file '{path}': {message}")]
    InputParseError {
        /// The path to the file.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// The payroll header lacks required columns.
    #[error("Missing required CSV columns: {}", columns.join(", "))]
    MissingColumns {
        /// The missing column names, in declaration order.
        columns: Vec<String>,
    },

    /// The payroll input has a header but no data rows.
    #[error("Input contains no data rows: {path}")]
    EmptyInput {
        /// The path (or source label) of the empty input.
        path: String,
    },

    /// A payroll record failed structural validation.
    #[error("Row {row}: {field} {message}")]
    InvalidRecord {
        /// 1-based row number (the CSV header is row 1).
        row: usize,
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The HTTP server could not bind or stopped with an error.
    #[error("Server error on {addr}: {message}")]
    ServerError {
        /// The listen address.
        addr: String,
        /// A description of the failure.
        message: String,
    },

    /// Writing an output artifact failed.
    #[error("Failed to write '{path}': {message}")]
    OutputError {
        /// The output path.
        path: String,
        /// A description of the failure.
        message: String,
    },
}

impl PreflightError {
    /// The process exit code callers observe for this error.
    pub fn exit_code(&self) -> i32 {
        ERROR_EXIT_CODE
    }

    /// Returns true for errors raised while reading or validating configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            PreflightError::ConfigNotFound { .. }
                | PreflightError::ConfigParseError { .. }
                | PreflightError::InvalidConfig { .. }
        )
    }
}

/// A type alias for Results that return PreflightError.
pub type PreflightResult<T> = Result<T, PreflightError>;
