//! Core error types for wordmail-core.
//!
//! This module defines the error hierarchy using thiserror. Each
//! collaborator (config, word list, state file, mail) gets its own enum and
//! [`CoreError`] wraps them for callers that only want one type.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for wordmail-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Word list errors
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    /// Scheduler state file errors
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// Mail composition or delivery errors
    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Could not determine or create the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Missing required configuration key
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),
}

/// Word list errors.
#[derive(Error, Debug)]
pub enum CorpusError {
    /// The word list file could not be read
    #[error("Failed to read word list {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The word list contained no parseable entries
    #[error("Word list {0} contains no words")]
    Empty(PathBuf),
}

/// State file errors. Reads never produce these (a broken file loads as
/// empty state); only writes do.
#[derive(Error, Debug)]
pub enum StateError {
    /// Serializing the state failed
    #[error("Failed to serialize state: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Writing the state file failed
    #[error("Failed to write state to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Mail errors.
#[derive(Error, Debug)]
pub enum MailError {
    /// A sender or recipient address did not parse
    #[error("Invalid address '{address}': {message}")]
    InvalidAddress { address: String, message: String },

    /// Building the MIME message failed
    #[error("Failed to build message: {0}")]
    Build(String),

    /// Connecting to or talking with the SMTP server failed
    #[error("SMTP error: {0}")]
    Transport(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<lettre::error::Error> for MailError {
    fn from(err: lettre::error::Error) -> Self {
        MailError::Build(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for MailError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        MailError::Transport(err.to_string())
    }
}
