//! Error types for the casebook library.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::FixtureType;

/// Comprehensive error type for all casebook operations.
#[derive(Error, Debug)]
pub enum CasebookError {
    /// Requested step position is outside the valid range
    #[error("Position {position} is out of range for a sequence of {len} steps")]
    InvalidPosition { position: u32, len: usize },

    /// A fixture reference does not fit the position of the referencing step
    #[error(
        "Step {step_id} at position {order} cannot reference {fixture_type} fixture {fixture_id}: \
         position {order} only accepts {required} fixtures"
    )]
    IncompatibleFixtureForPosition {
        step_id: u64,
        fixture_id: u64,
        fixture_type: FixtureType,
        required: FixtureType,
        order: u32,
    },

    /// Step not found for the given ID
    #[error("Step with ID {id} not found")]
    StepNotFound { id: u64 },

    /// Version not found in the parent's ledger
    #[error("Version {version_number} not found for {parent}")]
    VersionNotFound { parent: String, version_number: u32 },

    /// Fixture not found for the given ID
    #[error("Fixture with ID {id} not found")]
    FixtureNotFound { id: u64 },

    /// Test case not found for the given ID
    #[error("Test case with ID {id} not found")]
    TestCaseNotFound { id: u64 },

    /// The persistence collaborator could not complete a read or write
    #[error("Storage unavailable: {message}")]
    StorageUnavailable {
        message: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// A sequence operation would have broken the dense ordering
    #[error("Step ordering violated: {reason}")]
    OrderingViolated { reason: String },

    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },

    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating storage errors with context.
pub struct StorageErrorBuilder {
    message: String,
}

impl StorageErrorBuilder {
    /// Create a new storage error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> CasebookError {
        CasebookError::StorageUnavailable {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> CasebookError {
        CasebookError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl CasebookError {
    /// Creates a builder for storage errors.
    pub fn storage(message: impl Into<String>) -> StorageErrorBuilder {
        StorageErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Whether the error reports an unresolved step, version, fixture or
    /// test case id.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::StepNotFound { .. }
                | Self::VersionNotFound { .. }
                | Self::FixtureNotFound { .. }
                | Self::TestCaseNotFound { .. }
        )
    }

    /// Whether the error came from the persistence collaborator.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }
}

/// Specialized extension trait for storage-related Results.
pub trait StorageResultExt<T> {
    /// Map storage errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> StorageResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| CasebookError::storage(message).with_source(e))
    }
}

/// Result type alias for casebook operations
pub type Result<T> = std::result::Result<T, CasebookError>;
