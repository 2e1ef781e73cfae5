//! Task variants
//!
//! Three workflow task kinds share a [`TaskHeader`] and differ in their
//! phase type and kind-specific fields.

use crate::error::TransitionError;
use crate::types::{TaskHeader, TaskId, TaskKind, TaskStatus};
use crate::workflow::{validate_transition, ExceptionPhase, Phase, UploadPhase, ValidationPhase};
use serde::{Deserialize, Serialize};

/// Behavior shared by the task variants held in the store
pub trait WorkflowTask: Clone + Send + Sync + 'static {
    /// Workflow this task moves through
    type Phase: Phase;

    fn header(&self) -> &TaskHeader;

    fn header_mut(&mut self) -> &mut TaskHeader;

    fn phase(&self) -> Self::Phase;

    fn set_phase(&mut self, phase: Self::Phase);

    /// Meters this task accounts for on the dashboard
    fn tracked_meters(&self) -> u32;

    #[inline]
    fn id(&self) -> &TaskId {
        &self.header().id
    }

    #[inline]
    fn kind(&self) -> TaskKind {
        <Self::Phase as Phase>::KIND
    }

    #[inline]
    fn status(&self) -> TaskStatus {
        self.header().status
    }

    /// Take one workflow step
    ///
    /// Moves the phase and applies the status the new phase implies. A
    /// rejected step leaves the task untouched. Timestamps are the store's
    /// concern.
    fn advance(
        &mut self,
        action: <Self::Phase as Phase>::Action,
    ) -> Result<Self::Phase, TransitionError> {
        let next = validate_transition(self.phase(), action)?;
        self.set_phase(next);
        if let Some(status) = next.implied_status() {
            self.header_mut().status = status;
        }
        Ok(next)
    }
}

/// Upload of processed meter data to UL360
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadTask {
    #[serde(flatten)]
    pub header: TaskHeader,
    pub file_url: Option<String>,
    pub phase: UploadPhase,
}

impl UploadTask {
    /// New task awaiting download
    #[inline]
    #[must_use]
    pub fn new(header: TaskHeader) -> Self {
        Self {
            header,
            file_url: None,
            phase: UploadPhase::INITIAL,
        }
    }

    /// With the upload file location
    #[inline]
    #[must_use]
    pub fn with_file_url(mut self, url: impl Into<String>) -> Self {
        self.file_url = Some(url.into());
        self
    }
}

impl WorkflowTask for UploadTask {
    type Phase = UploadPhase;

    fn header(&self) -> &TaskHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut TaskHeader {
        &mut self.header
    }

    fn phase(&self) -> UploadPhase {
        self.phase
    }

    fn set_phase(&mut self, phase: UploadPhase) {
        self.phase = phase;
    }

    fn tracked_meters(&self) -> u32 {
        self.header.meter_count.unwrap_or(0)
    }
}

/// Meters missing from the external registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionTask {
    #[serde(flatten)]
    pub header: TaskHeader,
    pub missing_meter_count: u32,
    pub phase: ExceptionPhase,
}

impl ExceptionTask {
    /// New task for freshly detected missing meters
    #[inline]
    #[must_use]
    pub fn new(header: TaskHeader, missing_meter_count: u32) -> Self {
        Self {
            header,
            missing_meter_count,
            phase: ExceptionPhase::INITIAL,
        }
    }
}

impl WorkflowTask for ExceptionTask {
    type Phase = ExceptionPhase;

    fn header(&self) -> &TaskHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut TaskHeader {
        &mut self.header
    }

    fn phase(&self) -> ExceptionPhase {
        self.phase
    }

    fn set_phase(&mut self, phase: ExceptionPhase) {
        self.phase = phase;
    }

    fn tracked_meters(&self) -> u32 {
        self.missing_meter_count
    }
}

/// Data-quality defects blocking meters from an upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationTask {
    #[serde(flatten)]
    pub header: TaskHeader,
    pub error_type: String,
    pub error_details: String,
    pub fix_note: Option<String>,
    pub phase: ValidationPhase,
}

impl ValidationTask {
    /// New open validation task
    #[inline]
    #[must_use]
    pub fn new(
        header: TaskHeader,
        error_type: impl Into<String>,
        error_details: impl Into<String>,
    ) -> Self {
        Self {
            header,
            error_type: error_type.into(),
            error_details: error_details.into(),
            fix_note: None,
            phase: ValidationPhase::INITIAL,
        }
    }
}

impl WorkflowTask for ValidationTask {
    type Phase = ValidationPhase;

    fn header(&self) -> &TaskHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut TaskHeader {
        &mut self.header
    }

    fn phase(&self) -> ValidationPhase {
        self.phase
    }

    fn set_phase(&mut self, phase: ValidationPhase) {
        self.phase = phase;
    }

    fn tracked_meters(&self) -> u32 {
        self.header.meter_count.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Market;
    use crate::workflow::{ExceptionAction, UploadAction};
    use chrono::{TimeZone, Utc};

    fn header(id: &str, status: TaskStatus) -> TaskHeader {
        let created = Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap();
        TaskHeader::new(id, "Task", Market::UK, status, created)
    }

    #[test]
    fn download_keeps_status() {
        let mut task = UploadTask::new(header("ul360-1", TaskStatus::Pending));
        task.advance(UploadAction::Download).unwrap();
        assert!(task.phase.download_completed());
        assert_eq!(task.status(), TaskStatus::Pending);
    }

    #[test]
    fn rejected_step_leaves_task_untouched() {
        let mut task = UploadTask::new(header("ul360-1", TaskStatus::Pending));
        let before = task.clone();
        assert!(task.advance(UploadAction::RecordSuccess).is_err());
        assert_eq!(task, before);
    }

    #[test]
    fn reprocess_completes_exception() {
        let mut task = ExceptionTask::new(header("exception-1", TaskStatus::Attention), 30);
        task.advance(ExceptionAction::GenerateFile).unwrap();
        task.advance(ExceptionAction::ImportRegistry).unwrap();
        assert_eq!(task.status(), TaskStatus::Attention);
        task.advance(ExceptionAction::Reprocess).unwrap();
        assert_eq!(task.status(), TaskStatus::Completed);
        assert_eq!(task.kind(), TaskKind::Exception);
        assert_eq!(task.tracked_meters(), 30);
    }

    #[test]
    fn task_serializes_with_flattened_header() {
        let task = UploadTask::new(header("ul360-1", TaskStatus::Pending)).with_file_url("/f.xlsx");
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["id"], "ul360-1");
        assert_eq!(value["status"], "pending");
        assert_eq!(value["phase"], "awaiting-download");
    }
}
