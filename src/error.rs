//! Custom error types for the planner
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Every variant carries owned strings only, so
//! errors can be cloned into events and sent across worker threads.

use std::fmt;

use thiserror::Error;

/// The main error type for planner operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Bad input rejected before any I/O is attempted
    #[error("Validation error: {0}")]
    Validation(String),

    /// Local file I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Stored content could not be turned into a document
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// Missing or rejected remote credential
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Transport-level failure talking to the remote service
    #[error("Network error: {0}")]
    Network(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// The remote service rejected the request for another reason
    #[error("Remote service error: {0}")]
    RemoteService(String),

    /// Undo requested at the oldest snapshot
    #[error("No more commands to undo")]
    NoUndoAvailable,

    /// Redo requested at the newest snapshot
    #[error("No more commands to redo")]
    NoRedoAvailable,

    /// A background unit of work crashed before producing a result
    #[error("Background worker error: {0}")]
    Worker(String),
}

/// Coarse classification of a failure, used by events and notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Io,
    Conversion,
    Auth,
    Network,
    NotFound,
    RemoteService,
    History,
    Worker,
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Io => "IOError",
            ErrorKind::Conversion => "ConversionError",
            ErrorKind::Auth => "AuthError",
            ErrorKind::Network => "NetworkError",
            ErrorKind::NotFound => "NotFoundError",
            ErrorKind::RemoteService => "RemoteServiceError",
            ErrorKind::History => "HistoryError",
            ErrorKind::Worker => "WorkerError",
            ErrorKind::Other => "Error",
        };
        f.write_str(name)
    }
}

impl PlannerError {
    /// Create a "not found" error for persons
    pub fn person_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Person",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for backup files and remote resources
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::Duplicate { .. } => ErrorKind::Validation,
            Self::Io(_) => ErrorKind::Io,
            Self::Conversion(_) => ErrorKind::Conversion,
            Self::Auth(_) => ErrorKind::Auth,
            Self::Network(_) => ErrorKind::Network,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::RemoteService(_) => ErrorKind::RemoteService,
            Self::NoUndoAvailable | Self::NoRedoAvailable => ErrorKind::History,
            Self::Worker(_) => ErrorKind::Worker,
            Self::Config(_) => ErrorKind::Other,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for PlannerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Conversion(err.to_string())
    }
}

/// Result type alias for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
