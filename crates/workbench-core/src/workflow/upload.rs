use super::Phase;
use crate::types::{TaskKind, TaskStatus};
use serde::{Deserialize, Serialize};

/// Progress of a UL360 upload task
///
/// `AwaitingDownload -> Downloaded -> Uploaded | PartiallyUploaded`,
/// and `PartiallyUploaded -> ErrorReportUploaded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UploadPhase {
    AwaitingDownload,
    Downloaded,
    Uploaded,
    PartiallyUploaded,
    ErrorReportUploaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadAction {
    Download,
    RecordSuccess,
    RecordPartial,
    UploadErrorReport,
}

impl UploadPhase {
    pub fn download_completed(self) -> bool {
        !matches!(self, UploadPhase::AwaitingDownload)
    }

    pub fn upload_completed(self) -> bool {
        matches!(
            self,
            UploadPhase::Uploaded | UploadPhase::PartiallyUploaded | UploadPhase::ErrorReportUploaded
        )
    }

    pub fn partial_success(self) -> bool {
        matches!(
            self,
            UploadPhase::PartiallyUploaded | UploadPhase::ErrorReportUploaded
        )
    }

    /// A partial upload always requires a correction report
    pub fn error_report_required(self) -> bool {
        self.partial_success()
    }

    pub fn error_report_uploaded(self) -> bool {
        matches!(self, UploadPhase::ErrorReportUploaded)
    }
}

impl Phase for UploadPhase {
    type Action = UploadAction;

    const KIND: TaskKind = TaskKind::Upload;
    const INITIAL: Self = UploadPhase::AwaitingDownload;

    fn label(self) -> &'static str {
        match self {
            UploadPhase::AwaitingDownload => "awaiting download",
            UploadPhase::Downloaded => "downloaded",
            UploadPhase::Uploaded => "uploaded",
            UploadPhase::PartiallyUploaded => "partially uploaded",
            UploadPhase::ErrorReportUploaded => "error report uploaded",
        }
    }

    fn action_label(action: UploadAction) -> &'static str {
        match action {
            UploadAction::Download => "download",
            UploadAction::RecordSuccess => "record upload success",
            UploadAction::RecordPartial => "record partial upload",
            UploadAction::UploadErrorReport => "upload error report",
        }
    }

    fn next(self, action: UploadAction) -> Option<Self> {
        use UploadAction::*;
        use UploadPhase::*;
        match (self, action) {
            (AwaitingDownload, Download) => Some(Downloaded),
            (Downloaded, RecordSuccess) => Some(Uploaded),
            (Downloaded, RecordPartial) => Some(PartiallyUploaded),
            (PartiallyUploaded, UploadErrorReport) => Some(ErrorReportUploaded),
            _ => None,
        }
    }

    fn actions() -> &'static [UploadAction] {
        &[
            UploadAction::Download,
            UploadAction::RecordSuccess,
            UploadAction::RecordPartial,
            UploadAction::UploadErrorReport,
        ]
    }

    fn implied_status(self) -> Option<TaskStatus> {
        match self {
            // downloading leaves the status alone
            UploadPhase::AwaitingDownload | UploadPhase::Downloaded => None,
            UploadPhase::Uploaded | UploadPhase::ErrorReportUploaded => Some(TaskStatus::Completed),
            UploadPhase::PartiallyUploaded => Some(TaskStatus::Attention),
        }
    }
}
