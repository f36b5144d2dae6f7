//! Core error types for scholarsync-core.
//!
//! Nothing in the core is fatal: validation errors are returned to the caller
//! with the state untouched, while storage and planning failures are logged by
//! the layer that owns the fallback value.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for scholarsync-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Planning collaborator errors
    #[error("Planning error: {0}")]
    Planning(#[from] PlanningError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Validation errors raised before a store transition is applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is blank
    #[error("Field '{field}' must not be empty")]
    EmptyField { field: &'static str },

    /// A date string could not be parsed as YYYY-MM-DD
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// An identifier already exists in its collection
    #[error("Duplicate id '{id}' in {collection}")]
    DuplicateId {
        collection: &'static str,
        id: String,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(#[from] rusqlite::Error),

    /// The persisted blob could not be decoded
    #[error("Corrupted state blob '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The state could not be serialized
    #[error("Failed to encode state: {0}")]
    Encode(#[source] serde_json::Error),

    /// The repository lock was poisoned by a panicking writer
    #[error("Repository lock poisoned")]
    Poisoned,
}

/// Planning collaborator errors. Callers degrade these to an empty plan.
#[derive(Error, Debug)]
pub enum PlanningError {
    /// No API key configured
    #[error("No API key configured for the planning service")]
    MissingApiKey,

    /// Transport or HTTP status failure
    #[error("Planning request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with something we could not interpret
    #[error("Malformed planning response: {0}")]
    MalformedResponse(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse configuration at {path}: {message}")]
    ParseFailed { path: PathBuf, message: String },

    /// Failed to serialize configuration
    #[error("Failed to serialize configuration: {0}")]
    SerializeFailed(#[from] toml::ser::Error),

    /// Unknown dot-path key
    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    /// Value does not fit the key's type
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
