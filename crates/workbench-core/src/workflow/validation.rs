use super::Phase;
use crate::types::{TaskKind, TaskStatus};
use serde::{Deserialize, Serialize};

/// Progress of a data validation task
///
/// Downloading the validation file is session state, not a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationPhase {
    Open,
    AuditUploaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationAction {
    SubmitFix,
}

impl ValidationPhase {
    pub fn audit_file_uploaded(self) -> bool {
        matches!(self, ValidationPhase::AuditUploaded)
    }
}

impl Phase for ValidationPhase {
    type Action = ValidationAction;

    const KIND: TaskKind = TaskKind::Validation;
    const INITIAL: Self = ValidationPhase::Open;

    fn label(self) -> &'static str {
        match self {
            ValidationPhase::Open => "open",
            ValidationPhase::AuditUploaded => "audit uploaded",
        }
    }

    fn action_label(action: ValidationAction) -> &'static str {
        match action {
            ValidationAction::SubmitFix => "submit fix",
        }
    }

    fn next(self, action: ValidationAction) -> Option<Self> {
        match (self, action) {
            (ValidationPhase::Open, ValidationAction::SubmitFix) => Some(ValidationPhase::AuditUploaded),
            (ValidationPhase::AuditUploaded, _) => None,
        }
    }

    fn actions() -> &'static [ValidationAction] {
        &[ValidationAction::SubmitFix]
    }

    fn implied_status(self) -> Option<TaskStatus> {
        match self {
            ValidationPhase::Open => None,
            ValidationPhase::AuditUploaded => Some(TaskStatus::Completed),
        }
    }
}
