//! Error types for cabinet-cutlist-mcp.
//!
//! The engine itself never fails: an unbuildable cabinet is reported through
//! diagnostics on the cut list. These errors cover the I/O around it.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Errors loading a cabinet layout.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// Layout file could not be read.
    #[error("failed to read layout file: {path}")]
    Read {
        /// Path to the layout file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Layout JSON does not describe a cabinet.
    #[error("invalid cabinet layout: {source}")]
    Parse {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors writing a cut sheet.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The cut list carries blocking diagnostics.
    #[error("refusing to export an invalid cut list ({errors} blocking diagnostic(s))")]
    InvalidResult {
        /// Number of error diagnostics.
        errors: usize,
    },

    /// CSV encoding failed.
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Output file could not be written.
    #[error("failed to write {path}")]
    Io {
        /// Output path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The rendered CSV was not valid UTF-8.
    #[error("CSV output is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}
