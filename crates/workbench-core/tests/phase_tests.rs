use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use workbench_core::workflow::{
    allowed_actions, validate_transition, ExceptionAction, UploadAction, ValidationAction,
};
use workbench_core::{
    ExceptionPhase, ExceptionTask, Market, Phase, TaskHeader, TaskStatus, UploadPhase,
    UploadTask, ValidationPhase, WorkflowTask,
};

fn upload_phase() -> impl Strategy<Value = UploadPhase> {
    prop_oneof![
        Just(UploadPhase::AwaitingDownload),
        Just(UploadPhase::Downloaded),
        Just(UploadPhase::Uploaded),
        Just(UploadPhase::PartiallyUploaded),
        Just(UploadPhase::ErrorReportUploaded),
    ]
}

fn upload_action() -> impl Strategy<Value = UploadAction> {
    prop_oneof![
        Just(UploadAction::Download),
        Just(UploadAction::RecordSuccess),
        Just(UploadAction::RecordPartial),
        Just(UploadAction::UploadErrorReport),
    ]
}

fn exception_phase() -> impl Strategy<Value = ExceptionPhase> {
    prop_oneof![
        Just(ExceptionPhase::Detected),
        Just(ExceptionPhase::FileGenerated),
        Just(ExceptionPhase::RegistryImported),
        Just(ExceptionPhase::Reprocessed),
    ]
}

fn exception_action() -> impl Strategy<Value = ExceptionAction> {
    prop_oneof![
        Just(ExceptionAction::GenerateFile),
        Just(ExceptionAction::ImportRegistry),
        Just(ExceptionAction::Reprocess),
    ]
}

fn header(id: &str, status: TaskStatus) -> TaskHeader {
    TaskHeader::new(
        id,
        "task",
        Market::UK,
        status,
        Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap(),
    )
}

#[test]
fn test_upload_success_requires_download() {
    assert!(validate_transition(UploadPhase::AwaitingDownload, UploadAction::RecordSuccess).is_err());
    assert!(validate_transition(UploadPhase::AwaitingDownload, UploadAction::RecordPartial).is_err());
    assert!(validate_transition(UploadPhase::Downloaded, UploadAction::RecordSuccess).is_ok());
}

#[test]
fn test_reprocess_requires_import() {
    assert!(validate_transition(ExceptionPhase::Detected, ExceptionAction::Reprocess).is_err());
    assert!(validate_transition(ExceptionPhase::FileGenerated, ExceptionAction::Reprocess).is_err());
    assert!(validate_transition(ExceptionPhase::RegistryImported, ExceptionAction::Reprocess).is_ok());
}

#[test]
fn test_validation_single_step() {
    assert_eq!(
        validate_transition(ValidationPhase::Open, ValidationAction::SubmitFix),
        Ok(ValidationPhase::AuditUploaded)
    );
    assert!(ValidationPhase::AuditUploaded.is_terminal());
}

#[test]
fn test_rejected_advance_leaves_task_alone() {
    let mut task = ExceptionTask::new(header("exception-1", TaskStatus::Attention), 30);
    let before = task.clone();
    assert!(task.advance(ExceptionAction::Reprocess).is_err());
    assert_eq!(task, before);
}

proptest! {
    #[test]
    fn prop_upload_transitions_match_allowed(from in upload_phase(), action in upload_action()) {
        let res = validate_transition(from, action);
        prop_assert_eq!(res.is_ok(), allowed_actions(from).contains(&action));
    }

    #[test]
    fn prop_exception_transitions_match_allowed(from in exception_phase(), action in exception_action()) {
        let res = validate_transition(from, action);
        prop_assert_eq!(res.is_ok(), allowed_actions(from).contains(&action));
    }

    #[test]
    fn prop_upload_flags_never_reset(actions in prop::collection::vec(upload_action(), 0..12)) {
        let mut task = UploadTask::new(header("ul360-1", TaskStatus::Pending));
        for action in actions {
            let before = task.phase;
            if task.advance(action).is_ok() {
                prop_assert!(!before.download_completed() || task.phase.download_completed());
                prop_assert!(!before.partial_success() || task.phase.partial_success());
                prop_assert!(!before.upload_completed() || task.phase.upload_completed());
            } else {
                prop_assert_eq!(task.phase, before);
            }
            // no upload outcome without a download
            prop_assert!(!task.phase.upload_completed() || task.phase.download_completed());
            prop_assert!(!task.phase.partial_success() || task.phase.download_completed());
        }
    }

    #[test]
    fn prop_exception_flags_follow_order(actions in prop::collection::vec(exception_action(), 0..12)) {
        let mut task = ExceptionTask::new(header("exception-1", TaskStatus::Attention), 30);
        for action in actions {
            let _ = task.advance(action);
            let phase = task.phase;
            prop_assert!(!phase.registry_imported() || phase.exception_file_generated());
            prop_assert!(!phase.reprocessing_triggered() || phase.registry_imported());
            prop_assert_eq!(
                task.status() == TaskStatus::Completed,
                phase.reprocessing_triggered()
            );
        }
    }
}
