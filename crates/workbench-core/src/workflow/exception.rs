use super::Phase;
use crate::types::{TaskKind, TaskStatus};
use serde::{Deserialize, Serialize};

/// Progress of a meter registry exception task
///
/// Detection is implicit: seeded tasks start in `Detected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExceptionPhase {
    Detected,
    FileGenerated,
    RegistryImported,
    Reprocessed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionAction {
    GenerateFile,
    ImportRegistry,
    Reprocess,
}

impl ExceptionPhase {
    pub fn exception_file_generated(self) -> bool {
        !matches!(self, ExceptionPhase::Detected)
    }

    pub fn registry_imported(self) -> bool {
        matches!(
            self,
            ExceptionPhase::RegistryImported | ExceptionPhase::Reprocessed
        )
    }

    pub fn reprocessing_triggered(self) -> bool {
        matches!(self, ExceptionPhase::Reprocessed)
    }
}

impl Phase for ExceptionPhase {
    type Action = ExceptionAction;

    const KIND: TaskKind = TaskKind::Exception;
    const INITIAL: Self = ExceptionPhase::Detected;

    fn label(self) -> &'static str {
        match self {
            ExceptionPhase::Detected => "detected",
            ExceptionPhase::FileGenerated => "file generated",
            ExceptionPhase::RegistryImported => "registry imported",
            ExceptionPhase::Reprocessed => "reprocessed",
        }
    }

    fn action_label(action: ExceptionAction) -> &'static str {
        match action {
            ExceptionAction::GenerateFile => "generate exception file",
            ExceptionAction::ImportRegistry => "import registry",
            ExceptionAction::Reprocess => "reprocess",
        }
    }

    fn next(self, action: ExceptionAction) -> Option<Self> {
        use ExceptionAction::*;
        use ExceptionPhase::*;
        match (self, action) {
            // regenerating before the registry import is a fresh file, not a no-op
            (Detected | FileGenerated, GenerateFile) => Some(FileGenerated),
            (FileGenerated, ImportRegistry) => Some(RegistryImported),
            (RegistryImported, Reprocess) => Some(Reprocessed),
            _ => None,
        }
    }

    fn actions() -> &'static [ExceptionAction] {
        &[
            ExceptionAction::GenerateFile,
            ExceptionAction::ImportRegistry,
            ExceptionAction::Reprocess,
        ]
    }

    fn implied_status(self) -> Option<TaskStatus> {
        match self {
            ExceptionPhase::Reprocessed => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}
