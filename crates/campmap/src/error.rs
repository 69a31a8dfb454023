//! Error types for campmap.
//!
//! This module defines all error types used throughout the campmap crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for campmap operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Record Errors ===
    /// A camp failed validation.
    #[error("invalid camp: {message}")]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// A camp with this name is already in the catalog.
    #[error("camp '{name}' already exists")]
    DuplicateName {
        /// The conflicting name.
        name: String,
    },

    /// No camp with this name is in the catalog.
    #[error("camp '{name}' not found")]
    NotFound {
        /// The name that was looked up.
        name: String,
    },

    // === Storage Errors ===
    /// The file to load does not exist.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// Failed to read a file.
    #[error("failed to read {path}: {source}")]
    FileRead {
        /// Path being read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        /// Path being written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === CSV Errors ===
    /// A CSV file could not be read or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A CSV header lacks a required column.
    #[error("CSV header is missing required column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: &'static str,
    },

    // === Rendering Errors ===
    /// There are no camps to put on the map.
    #[error("no camps to render{}", filter_suffix(.filter))]
    NothingToRender {
        /// Icon filter that was applied, if any.
        filter: Option<String>,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn filter_suffix(filter: &Option<String>) -> String {
    filter
        .as_ref()
        .map(|f| format!(" for filter '{f}'"))
        .unwrap_or_default()
}

/// A specialized Result type for campmap operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a duplicate name error.
    #[must_use]
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName { name: name.into() }
    }

    /// Create a not-found error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Check if this error is a camp lookup miss.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error means a file to load was missing.
    #[must_use]
    pub fn is_file_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. })
    }

    /// Check if this error is a record validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this error is a duplicate name conflict.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateName { .. })
    }
}
