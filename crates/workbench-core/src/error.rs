//! Error types for the workbench
//!
//! The store never fails once a call reaches it. Errors come from the
//! boundary in front of it:
//! - Unknown task ids
//! - Workflow steps taken out of order
//! - Invalid user input (empty notes, wrong file types)
//! - Configuration loading

use crate::types::{TaskId, TaskKind};

/// Main workbench error type
#[derive(Debug, thiserror::Error)]
pub enum WorkbenchError {
    /// No task with this id in the addressed collection
    #[error("{kind} task not found: {id}")]
    TaskNotFound { kind: TaskKind, id: TaskId },

    /// Workflow step not reachable from the task's current phase
    #[error("transition rejected: {0}")]
    Transition(#[from] TransitionError),

    /// Input rejected before reaching the store
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl WorkbenchError {
    /// Create a not-found error
    #[inline]
    #[must_use]
    pub fn not_found(kind: TaskKind, id: &TaskId) -> Self {
        Self::TaskNotFound {
            kind,
            id: id.clone(),
        }
    }

    /// Check if the error is a workflow ordering violation
    #[inline]
    #[must_use]
    pub fn is_precondition_failure(&self) -> bool {
        matches!(
            self,
            Self::Transition(_) | Self::InvalidInput(InputError::ValidationFileNotDownloaded)
        )
    }

    /// Check if the user can fix the problem by changing their input
    #[inline]
    #[must_use]
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Workflow transition errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Action not allowed from the current phase
    #[error("cannot {action} {kind} task while {phase}")]
    NotAllowed {
        kind: TaskKind,
        phase: &'static str,
        action: &'static str,
    },
}

/// Input validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// Fix note empty after trimming
    #[error("fix note must not be empty")]
    EmptyFixNote,

    /// A step that needs an attached file got none
    #[error("no file attached")]
    MissingFile,

    /// File extension not accepted by this step
    #[error("unsupported file type for {filename} (accepted: {accepted})")]
    UnsupportedFileType { filename: String, accepted: String },

    /// Audit query empty after trimming
    #[error("audit query must not be empty")]
    EmptyAuditQuery,

    /// Fix submitted before the validation file was downloaded in this session
    #[error("validation file has not been downloaded")]
    ValidationFileNotDownloaded,
}

/// Convenience result alias
pub type Result<T, E = WorkbenchError> = std::result::Result<T, E>;
