//! Workflow phases per task kind
//!
//! Each task kind moves through a small linear state machine. The phase is
//! the single source of truth for workflow progress: the progress flags
//! (`download_completed`, `registry_imported`, ...) are derived from it, and
//! entering a phase may imply a task status.

pub mod exception;
pub mod upload;
pub mod validation;

pub use exception::{ExceptionAction, ExceptionPhase};
pub use upload::{UploadAction, UploadPhase};
pub use validation::{ValidationAction, ValidationPhase};

use crate::error::TransitionError;
use crate::types::{TaskKind, TaskStatus};
use std::fmt::Debug;

/// A workflow position with a fixed transition table
pub trait Phase: Copy + Eq + Debug + Send + Sync + 'static {
    /// Steps a user or agent can take
    type Action: Copy + Eq + Debug + Send + Sync + 'static;

    /// Collection this workflow belongs to
    const KIND: TaskKind;

    /// Phase a freshly detected task starts in
    const INITIAL: Self;

    /// Human-readable phase name
    fn label(self) -> &'static str;

    /// Human-readable action name
    fn action_label(action: Self::Action) -> &'static str;

    /// Target phase of `action`, or `None` when the table has no such edge
    fn next(self, action: Self::Action) -> Option<Self>;

    /// Every action, in workflow order
    fn actions() -> &'static [Self::Action];

    /// Status a task takes on entering this phase, if any
    fn implied_status(self) -> Option<TaskStatus>;

    /// Whether no further action is possible
    fn is_terminal(self) -> bool {
        Self::actions().iter().all(|a| self.next(*a).is_none())
    }
}

/// Validates a workflow step and returns the phase it leads to.
pub fn validate_transition<P: Phase>(from: P, action: P::Action) -> Result<P, TransitionError> {
    from.next(action).ok_or(TransitionError::NotAllowed {
        kind: P::KIND,
        phase: from.label(),
        action: P::action_label(action),
    })
}

/// Actions currently reachable from `from`
pub fn allowed_actions<P: Phase>(from: P) -> Vec<P::Action> {
    P::actions()
        .iter()
        .copied()
        .filter(|a| from.next(*a).is_some())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_phases_are_not_terminal() {
        assert!(!UploadPhase::INITIAL.is_terminal());
        assert!(!ExceptionPhase::INITIAL.is_terminal());
        assert!(!ValidationPhase::INITIAL.is_terminal());
    }

    #[test]
    fn rejection_carries_labels() {
        let err = validate_transition(ExceptionPhase::Detected, ExceptionAction::Reprocess)
            .unwrap_err();
        assert_eq!(
            err,
            TransitionError::NotAllowed {
                kind: TaskKind::Exception,
                phase: "detected",
                action: "reprocess",
            }
        );
    }
}
