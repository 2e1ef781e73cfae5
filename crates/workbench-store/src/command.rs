//! Command dispatch
//!
//! Every mutation the workbench supports, as data. Front ends build a
//! [`Command`] and hand it to [`dispatch`]; the outcome carries whatever the
//! operation produced.

use crate::workflow::{AuditReport, WorkflowService};
use serde::{Deserialize, Serialize};
use workbench_core::{
    ActivityLogEntry, ArchiveFile, ExceptionTask, FileRef, Market, Result, TaskId, TaskKind,
    TaskPatch, UpdateOutcome, UploadTask, ValidationTask,
};

/// A named mutation of the workbench
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Raw header patch, bypassing workflow checks
    UpdateTask {
        kind: TaskKind,
        id: TaskId,
        patch: TaskPatch,
    },
    DownloadUploadFile {
        id: TaskId,
    },
    RecordUploadSuccess {
        id: TaskId,
    },
    RecordUploadPartial {
        id: TaskId,
        #[serde(default)]
        error_count: Option<u32>,
    },
    UploadErrorReport {
        id: TaskId,
        file: Option<FileRef>,
    },
    GenerateExceptionFile {
        id: TaskId,
    },
    ImportRegistry {
        id: TaskId,
        file: Option<FileRef>,
    },
    Reprocess {
        id: TaskId,
    },
    DownloadValidationFile {
        id: TaskId,
    },
    SubmitFix {
        id: TaskId,
        note: String,
        file: Option<FileRef>,
    },
    IngestMeterFile {
        file: FileRef,
        market: Market,
    },
    RequestAudit {
        market: Market,
        query: String,
    },
    SwitchUser {
        username: String,
    },
}

impl Command {
    /// Short name for logging
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::UpdateTask { .. } => "update_task",
            Self::DownloadUploadFile { .. } => "download_upload_file",
            Self::RecordUploadSuccess { .. } => "record_upload_success",
            Self::RecordUploadPartial { .. } => "record_upload_partial",
            Self::UploadErrorReport { .. } => "upload_error_report",
            Self::GenerateExceptionFile { .. } => "generate_exception_file",
            Self::ImportRegistry { .. } => "import_registry",
            Self::Reprocess { .. } => "reprocess",
            Self::DownloadValidationFile { .. } => "download_validation_file",
            Self::SubmitFix { .. } => "submit_fix",
            Self::IngestMeterFile { .. } => "ingest_meter_file",
            Self::RequestAudit { .. } => "request_audit",
            Self::SwitchUser { .. } => "switch_user",
        }
    }
}

/// What a dispatched command produced
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    Updated(UpdateOutcome),
    Upload(UploadTask),
    Exception(ExceptionTask),
    Validation(ValidationTask),
    Logged(ActivityLogEntry),
    Archived(ArchiveFile),
    Audit(AuditReport),
    UserSwitched(String),
}

/// Run one command against the service
pub async fn dispatch(service: &WorkflowService, command: Command) -> Result<Outcome> {
    let name = command.name();
    tracing::debug!(command = name, "dispatching");

    let outcome = match command {
        Command::UpdateTask { kind, id, patch } => {
            Outcome::Updated(service.store().update_task(kind, &id, patch))
        }
        Command::DownloadUploadFile { id } => Outcome::Upload(service.download_upload_file(&id)?),
        Command::RecordUploadSuccess { id } => {
            Outcome::Upload(service.record_upload_success(&id)?)
        }
        Command::RecordUploadPartial { id, error_count } => {
            Outcome::Upload(service.record_upload_partial(&id, error_count)?)
        }
        Command::UploadErrorReport { id, file } => {
            Outcome::Upload(service.upload_error_report(&id, file.as_ref())?)
        }
        Command::GenerateExceptionFile { id } => {
            Outcome::Exception(service.generate_exception_file(&id).await?)
        }
        Command::ImportRegistry { id, file } => {
            Outcome::Exception(service.import_registry(&id, file.as_ref())?)
        }
        Command::Reprocess { id } => Outcome::Exception(service.reprocess(&id).await?),
        Command::DownloadValidationFile { id } => {
            Outcome::Logged(service.download_validation_file(&id)?)
        }
        Command::SubmitFix { id, note, file } => {
            Outcome::Validation(service.submit_fix(&id, &note, file.as_ref())?)
        }
        Command::IngestMeterFile { file, market } => {
            Outcome::Archived(service.ingest_meter_file(&file, market)?)
        }
        Command::RequestAudit { market, query } => {
            Outcome::Audit(service.request_audit(market, &query).await?)
        }
        Command::SwitchUser { username } => {
            service.set_current_user(username.clone());
            Outcome::UserSwitched(username)
        }
    };

    Ok(outcome)
}
