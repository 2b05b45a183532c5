//! Error types for the tree grid.

use crate::drag_drop::ZoneParseError;

/// Result type alias for grid operations.
pub type GridResult<T> = std::result::Result<T, GridError>;

/// Failure reported by a host callback future (edit commit, drop persistence,
/// valid-target lookup).
///
/// The grid never inspects the message; it is logged and handed back to the
/// caller of the operation that triggered the callback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HostError {
    message: String,
}

impl HostError {
    /// Create a host error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for HostError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for HostError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Errors that can occur in grid operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// No row with this identifier exists anywhere in the forest.
    #[error("Unknown row '{0}'")]
    UnknownRow(String),

    /// No column with this identifier is configured.
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// The cell is not open for editing.
    #[error("Cell '{row}/{column}' is not being edited")]
    NotEditing { row: String, column: String },

    /// The column parser rejected the editor value.
    #[error("Invalid value for column '{column}': {message}")]
    Parse { column: String, message: String },

    /// The host rejected the edit commit.
    #[error("Edit commit failed: {0}")]
    Commit(#[source] HostError),

    /// A drop-zone handle could not be parsed.
    #[error(transparent)]
    InvalidZone(#[from] ZoneParseError),
}

impl GridError {
    /// Create an unknown row error.
    pub fn unknown_row(row: impl std::fmt::Display) -> Self {
        Self::UnknownRow(row.to_string())
    }

    /// Create an unknown column error.
    pub fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn(column.into())
    }

    /// Create a parse error.
    pub fn parse(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            column: column.into(),
            message: message.into(),
        }
    }
}
