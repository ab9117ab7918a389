//! Error types for glacimatch

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlacimatchError {
    // Station table errors
    #[error("Required column '{column}' not found in {path}")]
    StationColumnMissing { column: String, path: PathBuf },

    #[error("Row {row}: cannot parse '{value}' in column '{column}' as a coordinate")]
    InvalidCoordinate {
        row: usize,
        column: String,
        value: String,
    },

    // Vector file errors
    #[error("Attribute '{attribute}' not found in dataset '{dataset}'")]
    AttributeMissing { attribute: String, dataset: String },

    #[error("{format} error: {message}")]
    FormatError { format: String, message: String },

    #[error("Unsupported file extension '{extension}'. Supported: {}", .supported.join(", "))]
    UnsupportedFormat {
        extension: String,
        supported: Vec<String>,
    },

    #[error("Invalid path {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    // Projection errors
    #[error("Projection from {from} to {to} failed: {reason}")]
    Projection {
        from: String,
        to: String,
        reason: String,
    },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // CSV errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, GlacimatchError>;
