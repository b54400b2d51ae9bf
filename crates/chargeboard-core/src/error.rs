//! Error types for chargeboard-core
//!
//! Fatal load problems are `CoreError`s and abort startup. Lenient findings
//! (unresolved joins, vanished short sessions) are collected in a `LoadReport`.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for chargeboard operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // IO Errors
    // ===================
    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    // ===================
    // Parse Errors
    // ===================
    #[error("Failed to parse CSV in {path} (line {line}): {message}")]
    CsvParse {
        path: PathBuf,
        line: u64,
        message: String,
        #[source]
        source: csv::Error,
    },

    #[error("Missing required column '{column}' in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Malformed timestamp '{value}' in {path} (line {line})")]
    MalformedTimestamp {
        path: PathBuf,
        line: u64,
        value: String,
    },

    #[error("Duplicate key '{key}' in {path}: registry join must be many-to-one")]
    DuplicateKey { path: PathBuf, key: String },

    // ===================
    // Config Errors
    // ===================
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Unknown time zone: {name}")]
    UnknownTimeZone { name: String },

    // ===================
    // Query Errors
    // ===================
    #[error("Invalid date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { value: String },

    #[error("Invalid heatmap cell: hour '{hour}', weekday '{weekday}'")]
    InvalidCell { hour: String, weekday: String },

    #[error("Invalid trigger '{value}' (expected date, contract, click or reset)")]
    InvalidTrigger { value: String },
}

/// Severity level for findings during load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Non-critical, data is usable
    Warning,
    /// Significant but not fatal
    Error,
}

/// Individual entry in a load report
#[derive(Debug, Clone)]
pub struct LoadError {
    pub source: String,
    pub message: String,
    pub severity: ErrorSeverity,
}

impl LoadError {
    pub fn warning(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
            severity: ErrorSeverity::Warning,
        }
    }

    pub fn error(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
            severity: ErrorSeverity::Error,
        }
    }
}

/// Report of what the dataset load found
///
/// Unmatched joins are tolerated: the affected sessions are kept with
/// missing contract fields and only counted here.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub errors: Vec<LoadError>,
    pub transactions_read: usize,
    pub chargers_read: usize,
    pub contracts_read: usize,
    pub sessions_built: usize,
    /// Transactions whose charger is absent from the charger registry
    pub unmatched_chargers: usize,
    /// Transactions whose registered charger points at an unknown (or empty)
    /// contract; unregistered chargers are only counted above
    pub unmatched_contracts: usize,
    /// Sessions whose rounded duration is zero hours
    pub zero_duration_sessions: usize,
    /// Transactions that stop before they start
    pub inverted_sessions: usize,
}

impl LoadReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: LoadError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, source: impl Into<String>, message: impl Into<String>) {
        self.errors.push(LoadError::warning(source, message));
    }

    /// Returns true if any finding has `Error` severity
    pub fn has_errors(&self) -> bool {
        self.errors
            .iter()
            .any(|e| e.severity == ErrorSeverity::Error)
    }

    /// Returns only warnings
    pub fn warnings(&self) -> impl Iterator<Item = &LoadError> {
        self.errors
            .iter()
            .filter(|e| e.severity == ErrorSeverity::Warning)
    }

    /// Returns (warnings, errors)
    pub fn error_count(&self) -> (usize, usize) {
        let warnings = self.warnings().count();
        (warnings, self.errors.len() - warnings)
    }

    /// Turn the join/duration counters into report entries
    pub fn summarize(&mut self) {
        if self.inverted_sessions > 0 {
            self.add_error(LoadError::error(
                "transactions",
                format!(
                    "{} transactions stop before they start; their duration wraps around the day",
                    self.inverted_sessions
                ),
            ));
        }
        if self.unmatched_chargers > 0 {
            self.add_warning(
                "join",
                format!(
                    "{} transactions reference a charger missing from the registry",
                    self.unmatched_chargers
                ),
            );
        }
        if self.unmatched_contracts > 0 {
            self.add_warning(
                "join",
                format!(
                    "{} transactions resolve to no contract",
                    self.unmatched_contracts
                ),
            );
        }
        if self.zero_duration_sessions > 0 {
            self.add_warning(
                "duration",
                format!(
                    "{} sessions round to zero hours and add nothing to the heatmap",
                    self.zero_duration_sessions
                ),
            );
        }
    }
}
