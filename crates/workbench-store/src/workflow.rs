//! Workflow service
//!
//! The boundary in front of the store. Each operation corresponds to one
//! user or agent action:
//! - Validates input (notes, attached file types)
//! - Checks the workflow precondition before any simulated delay
//! - Commits the task change and its activity entry through the store
//!
//! Rejected operations leave the store untouched.

use crate::clock::{Delay, TokioDelay};
use crate::config::WorkbenchConfig;
use crate::store::{Store, StoredTask};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use workbench_core::files::{self, AUDIT_EVIDENCE, METER_DATA, SPREADSHEET};
use workbench_core::workflow::{
    validate_transition, ExceptionAction, UploadAction, ValidationAction,
};
use workbench_core::{
    ActivityLogEntry, ArchiveFile, ExceptionTask, FileRef, InputError, Market, NewActivity,
    NewArchiveFile, Phase, Result, TaskId, TaskKind, TaskStatus, UploadTask, ValidationTask,
    WorkbenchError, WorkflowTask,
};

/// Answer to an audit request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub market: Market,
    pub query: String,
    pub response: String,
}

/// Named workflow operations over a shared [`Store`]
#[derive(Debug)]
pub struct WorkflowService {
    store: Arc<Store>,
    delay: Arc<dyn Delay>,
    config: WorkbenchConfig,
    current_user: RwLock<String>,
    /// Validation tasks whose error file was downloaded this session
    downloaded_validation: Mutex<HashSet<TaskId>>,
}

impl WorkflowService {
    /// Service sleeping on the tokio timer for simulated work
    #[must_use]
    pub fn new(store: Arc<Store>, config: WorkbenchConfig) -> Self {
        Self::with_delay(store, config, Arc::new(TokioDelay))
    }

    /// Service with a custom delay
    #[must_use]
    pub fn with_delay(store: Arc<Store>, config: WorkbenchConfig, delay: Arc<dyn Delay>) -> Self {
        Self {
            current_user: RwLock::new(config.current_user.clone()),
            store,
            delay,
            config,
            downloaded_validation: Mutex::new(HashSet::new()),
        }
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &WorkbenchConfig {
        &self.config
    }

    #[must_use]
    pub fn current_user(&self) -> String {
        self.current_user.read().clone()
    }

    /// Switch the user stamped on human activity
    pub fn set_current_user(&self, username: impl Into<String>) {
        let username = username.into();
        tracing::info!(user = %username, "switched current user");
        *self.current_user.write() = username;
    }

    fn human(&self, action: &str, market: Market) -> NewActivity {
        NewActivity::human(action, market).by(self.current_user())
    }

    /// Fail fast when `action` is not reachable, before any simulated work
    fn precheck<T: StoredTask>(
        &self,
        id: &TaskId,
        action: <T::Phase as Phase>::Action,
    ) -> Result<T> {
        let task: T = self
            .store
            .task(id)
            .ok_or_else(|| WorkbenchError::not_found(<T::Phase as Phase>::KIND, id))?;
        validate_transition(task.phase(), action).map_err(|e| {
            tracing::warn!(%id, error = %e, "workflow step rejected");
            e
        })?;
        Ok(task)
    }

    fn step<T: StoredTask>(
        &self,
        id: &TaskId,
        action: <T::Phase as Phase>::Action,
        describe: impl FnOnce(&mut T) -> NewActivity,
    ) -> Result<T> {
        let result = self.store.transition::<T, _>(id, |task| {
            task.advance(action)?;
            Ok(describe(task))
        });
        match result {
            Ok((task, entry)) => {
                tracing::info!(
                    %id,
                    phase = task.phase().label(),
                    status = %task.status(),
                    action = %entry.action,
                    "workflow step committed"
                );
                Ok(task)
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "workflow step rejected");
                Err(e)
            }
        }
    }

    // ---------------------------------------------------------------------
    // Upload tasks
    // ---------------------------------------------------------------------

    /// Download the prepared upload file; status is unchanged
    pub fn download_upload_file(&self, id: &TaskId) -> Result<UploadTask> {
        let user = self.current_user();
        self.step::<UploadTask>(id, UploadAction::Download, |task| {
            NewActivity::human("Downloaded Upload File", task.header.market)
                .by(user)
                .for_task(task.header.id.clone())
                .with_details(task.header.title.clone())
        })
    }

    /// Record that UL360 accepted every meter
    pub fn record_upload_success(&self, id: &TaskId) -> Result<UploadTask> {
        let user = self.current_user();
        self.step::<UploadTask>(id, UploadAction::RecordSuccess, |task| {
            NewActivity::human("Upload Successful", task.header.market)
                .by(user)
                .for_task(task.header.id.clone())
                .with_details(format!(
                    "Successfully uploaded {} meters",
                    task.header.meter_count.unwrap_or(0)
                ))
        })
    }

    /// Record that UL360 rejected some meters
    ///
    /// `error_count`, when given, replaces the task's error count before it
    /// is reported.
    pub fn record_upload_partial(&self, id: &TaskId, error_count: Option<u32>) -> Result<UploadTask> {
        self.step::<UploadTask>(id, UploadAction::RecordPartial, |task| {
            if let Some(count) = error_count {
                task.header.error_count = Some(count);
            }
            NewActivity::agent("Detected Partial Upload Success", task.header.market)
                .for_task(task.header.id.clone())
                .with_details(format!(
                    "Upload completed with {} errors requiring attention",
                    task.header.error_count.unwrap_or(0)
                ))
        })
    }

    /// Upload the correction report for a partial upload
    pub fn upload_error_report(&self, id: &TaskId, file: Option<&FileRef>) -> Result<UploadTask> {
        let file = files::ensure_accepted(file, SPREADSHEET)?;
        let user = self.current_user();
        self.step::<UploadTask>(id, UploadAction::UploadErrorReport, |task| {
            NewActivity::human("Uploaded Error Report", task.header.market)
                .by(user)
                .for_task(task.header.id.clone())
                .with_details(format!("Uploaded correction file: {}", file.name))
        })
    }

    // ---------------------------------------------------------------------
    // Exception tasks
    // ---------------------------------------------------------------------

    /// Agent generates the exception file for the missing meters
    pub async fn generate_exception_file(&self, id: &TaskId) -> Result<ExceptionTask> {
        self.precheck::<ExceptionTask>(id, ExceptionAction::GenerateFile)?;
        tracing::debug!(%id, "generating exception file");
        self.delay.wait(self.config.generate_delay()).await;

        self.step::<ExceptionTask>(id, ExceptionAction::GenerateFile, |task| {
            NewActivity::agent("Generated Exception File", task.header.market)
                .for_task(task.header.id.clone())
                .with_details(format!(
                    "Exception file created for {} missing meters",
                    task.missing_meter_count
                ))
        })
    }

    /// Import the corrected registry exported from UL360
    pub fn import_registry(&self, id: &TaskId, file: Option<&FileRef>) -> Result<ExceptionTask> {
        let file = files::ensure_accepted(file, SPREADSHEET)?;
        let user = self.current_user();
        self.step::<ExceptionTask>(id, ExceptionAction::ImportRegistry, |task| {
            NewActivity::human("Imported Corrected Registry", task.header.market)
                .by(user)
                .for_task(task.header.id.clone())
                .with_details(format!("Uploaded registry file: {}", file.name))
        })
    }

    /// Agent reprocesses meter data against the imported registry
    pub async fn reprocess(&self, id: &TaskId) -> Result<ExceptionTask> {
        self.precheck::<ExceptionTask>(id, ExceptionAction::Reprocess)?;
        tracing::debug!(%id, "reprocessing meter data");
        self.delay.wait(self.config.reprocess_delay()).await;

        self.step::<ExceptionTask>(id, ExceptionAction::Reprocess, |task| {
            NewActivity::agent("Reprocessed Meter Data", task.header.market)
                .for_task(task.header.id.clone())
                .with_details(format!(
                    "Reprocessing {} meters after registry update",
                    task.missing_meter_count
                ))
        })
    }

    // ---------------------------------------------------------------------
    // Validation tasks
    // ---------------------------------------------------------------------

    /// Download the validation error file for offline correction
    ///
    /// Enables [`Self::submit_fix`] for this task for the rest of the
    /// session. Repeatable; every download is logged.
    pub fn download_validation_file(&self, id: &TaskId) -> Result<ActivityLogEntry> {
        let task: ValidationTask = self
            .store
            .task(id)
            .ok_or_else(|| WorkbenchError::not_found(TaskKind::Validation, id))?;

        self.downloaded_validation.lock().insert(id.clone());
        let entry = self.store.append_activity(
            self.human("Downloaded Validation Error File", task.header.market)
                .for_task(id.clone())
                .with_details("Downloaded file for offline correction"),
        );
        tracing::info!(%id, "validation file downloaded");
        Ok(entry)
    }

    #[must_use]
    pub fn validation_file_downloaded(&self, id: &TaskId) -> bool {
        self.downloaded_validation.lock().contains(id)
    }

    /// Submit the fix note and manual audit file
    pub fn submit_fix(
        &self,
        id: &TaskId,
        note: &str,
        audit_file: Option<&FileRef>,
    ) -> Result<ValidationTask> {
        if !self.validation_file_downloaded(id) {
            // unknown ids report not-found rather than the missing download
            if self.store.task::<ValidationTask>(id).is_none() {
                return Err(WorkbenchError::not_found(TaskKind::Validation, id));
            }
            return Err(InputError::ValidationFileNotDownloaded.into());
        }
        let note = note.trim();
        if note.is_empty() {
            return Err(InputError::EmptyFixNote.into());
        }
        files::ensure_accepted(audit_file, AUDIT_EVIDENCE)?;

        let user = self.current_user();
        self.step::<ValidationTask>(id, ValidationAction::SubmitFix, |task| {
            task.fix_note = Some(note.to_string());
            NewActivity::human("Uploaded Manual Audit File", task.header.market)
                .by(user)
                .for_task(task.header.id.clone())
                .with_details(format!("Fix note: {note}"))
        })
    }

    // ---------------------------------------------------------------------
    // Dashboard
    // ---------------------------------------------------------------------

    /// Archive a raw meter data file uploaded from the dashboard
    pub fn ingest_meter_file(&self, file: &FileRef, market: Market) -> Result<ArchiveFile> {
        files::ensure_accepted(Some(file), METER_DATA)?;

        let (record, _) = self.store.archive_with_activity(
            NewArchiveFile {
                filename: file.name.clone(),
                cycle: None,
                market,
                size: files::format_size(file.size_bytes),
                file_type: files::classify(&file.name),
                download_url: format!("/api/files/{}", file.name),
            },
            self.human("Uploaded Meter Data File", market)
                .with_details(format!("{} uploaded", file.name)),
        );
        tracing::info!(file = %record.filename, %market, kind = %record.file_type, "archived meter data file");
        Ok(record)
    }

    /// Ask the agent for an audit summary of a market
    pub async fn request_audit(&self, market: Market, query: &str) -> Result<AuditReport> {
        let query = query.trim();
        if query.is_empty() {
            return Err(InputError::EmptyAuditQuery.into());
        }
        self.delay.wait(self.config.audit_delay()).await;

        let response = self.store.read(|state| {
            let in_market = |status: TaskStatus, header: &workbench_core::TaskHeader| {
                header.market == market && header.status == status
            };
            let uploads: Vec<&UploadTask> =
                state.uploads.iter().filter(|t| t.header.market == market).collect();
            let open_exceptions: u32 = state
                .exceptions
                .iter()
                .filter(|t| t.header.market == market && t.status() != TaskStatus::Completed)
                .map(|t| t.missing_meter_count)
                .sum();
            let open_validations = state
                .validations
                .iter()
                .filter(|t| in_market(TaskStatus::Attention, &t.header))
                .count();
            let meters: u32 = uploads.iter().map(|t| t.tracked_meters()).sum();
            let cycle = state
                .cycles
                .iter()
                .find(|c| c.market == market)
                .map_or_else(|| "no cycle on record".to_string(), |c| {
                    format!("{} (quality score {}%)", c.period, c.quality_score)
                });

            format!(
                "Audit summary for {market}, latest cycle {cycle}:\n\
                 - Upload tasks: {} covering {meters} meters\n\
                 - Meters missing from registry: {open_exceptions}\n\
                 - Validation tasks awaiting review: {open_validations}",
                uploads.len()
            )
        });

        tracing::info!(%market, "audit request answered");
        Ok(AuditReport {
            market,
            query: query.to_string(),
            response,
        })
    }
}
