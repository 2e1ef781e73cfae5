use pretty_assertions::assert_eq;
use workbench_core::{
    Actor, ExceptionTask, InputError, TaskId, TaskKind, TaskPatch, TaskStatus, UpdateOutcome,
    UploadTask, WorkbenchError, WorkflowTask,
};
use workbench_test_utils::{assert_actions, pdf, spreadsheet, TestBench};

#[test]
fn ul360_partial_upload_with_error_report() {
    let bench = TestBench::seeded();
    let id = TaskId::from("ul360-1");
    let log_len = bench.log_len();

    bench.service.download_upload_file(&id).unwrap();
    bench.tick(10);
    bench.service.record_upload_partial(&id, Some(12)).unwrap();
    bench.tick(10);
    let task = bench
        .service
        .upload_error_report(&id, Some(&spreadsheet("UK Upload Errors")))
        .unwrap();

    assert_eq!(task.status(), TaskStatus::Completed);
    assert!(task.phase.download_completed());
    assert!(task.phase.partial_success());
    assert!(task.phase.error_report_uploaded());
    assert_eq!(task.header.error_count, Some(12));

    assert_eq!(bench.log_len(), log_len + 3);
    let latest = bench.latest(3);
    assert_actions(
        &latest,
        &[
            "Uploaded Error Report",
            "Detected Partial Upload Success",
            "Downloaded Upload File",
        ],
    );
    assert!(latest.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    assert_eq!(latest[1].actor, Actor::Agent);
    assert_eq!(latest[0].username.as_deref(), Some("Sarah Mitchell"));
    assert!(latest.iter().all(|e| e.task_id.as_ref() == Some(&id)));
}

#[test]
fn download_is_not_repeatable() {
    let bench = TestBench::seeded();
    let id = TaskId::from("ul360-1");
    bench.service.download_upload_file(&id).unwrap();
    let log_len = bench.log_len();

    assert!(bench.service.download_upload_file(&id).is_err());
    assert_eq!(bench.log_len(), log_len);
}

#[test]
fn partial_upload_needs_attention_until_report() {
    let bench = TestBench::seeded();
    let id = TaskId::from("ul360-1");
    bench.service.download_upload_file(&id).unwrap();
    let task = bench.service.record_upload_partial(&id, None).unwrap();

    assert_eq!(task.status(), TaskStatus::Attention);
    assert!(task.phase.error_report_required());
    assert_eq!(bench.store.badges().uploads, 1);
    assert_eq!(
        bench.latest(1)[0].details.as_deref(),
        Some("Upload completed with 0 errors requiring attention")
    );
}

#[tokio::test]
async fn exception_full_path() {
    let bench = TestBench::seeded();
    let id = TaskId::from("exception-1");
    let log_len = bench.log_len();

    bench.service.generate_exception_file(&id).await.unwrap();
    bench.tick(30);
    bench
        .service
        .import_registry(&id, Some(&spreadsheet("UK Registry Export")))
        .unwrap();
    bench.tick(30);
    let task = bench.service.reprocess(&id).await.unwrap();

    assert_eq!(task.status(), TaskStatus::Completed);
    assert!(task.phase.exception_file_generated());
    assert!(task.phase.registry_imported());
    assert!(task.phase.reprocessing_triggered());

    assert_eq!(bench.log_len(), log_len + 3);
    let latest = bench.latest(3);
    assert_actions(
        &latest,
        &[
            "Reprocessed Meter Data",
            "Imported Corrected Registry",
            "Generated Exception File",
        ],
    );
    assert_eq!(
        latest[0].details.as_deref(),
        Some("Reprocessing 30 meters after registry update")
    );
    assert_eq!(
        latest[1].details.as_deref(),
        Some("Uploaded registry file: UK Registry Export.xlsx")
    );
}

#[tokio::test]
async fn reprocess_before_import_is_refused() {
    let bench = TestBench::seeded();
    let id = TaskId::from("exception-1");
    bench.service.generate_exception_file(&id).await.unwrap();
    let before: ExceptionTask = bench.store.task(&id).unwrap();
    let log_len = bench.log_len();
    let waits = bench.delay.waits().len();

    let err = bench.service.reprocess(&id).await.unwrap_err();

    assert!(matches!(err, WorkbenchError::Transition(_)));
    assert_eq!(bench.store.task::<ExceptionTask>(&id).unwrap(), before);
    assert_eq!(bench.log_len(), log_len);
    // rejected before the simulated work starts
    assert_eq!(bench.delay.waits().len(), waits);
}

#[test]
fn store_level_patch_bypasses_workflow() {
    let bench = TestBench::seeded();
    let id = TaskId::from("exception-1");

    let outcome = bench.store.update_task(
        TaskKind::Exception,
        &id,
        TaskPatch::new().status(TaskStatus::Completed),
    );
    assert_eq!(outcome, UpdateOutcome::Found);

    let task: ExceptionTask = bench.store.task(&id).unwrap();
    assert_eq!(task.status(), TaskStatus::Completed);
    assert!(!task.phase.registry_imported());
    assert_eq!(task.header.updated_at, bench.store.now());
}

#[test]
fn import_rejects_wrong_file_type() {
    let bench = TestBench::seeded();
    let err = bench
        .service
        .import_registry(&"exception-1".into(), Some(&pdf("registry")))
        .unwrap_err();
    assert!(matches!(
        err,
        WorkbenchError::InvalidInput(InputError::UnsupportedFileType { .. })
    ));
}

#[test]
fn validation_fix_flow() {
    let bench = TestBench::seeded();
    bench.service.set_current_user("Emma Rodriguez");
    let id = TaskId::from("validation-1");
    let log_len = bench.log_len();

    bench.service.download_validation_file(&id).unwrap();
    bench.service.download_validation_file(&id).unwrap();
    let task = bench
        .service
        .submit_fix(&id, "  Replaced estimated readings  ", Some(&pdf("Manual Audit")))
        .unwrap();

    assert_eq!(task.status(), TaskStatus::Completed);
    assert_eq!(task.fix_note.as_deref(), Some("Replaced estimated readings"));
    assert_eq!(bench.store.badges().validations, 0);

    assert_eq!(bench.log_len(), log_len + 3);
    let latest = bench.latest(1);
    assert_eq!(latest[0].action, "Uploaded Manual Audit File");
    assert_eq!(latest[0].username.as_deref(), Some("Emma Rodriguez"));
}

#[test]
fn upload_task_untouched_by_other_kinds() {
    let bench = TestBench::seeded();
    let before: UploadTask = bench.store.task(&"ul360-1".into()).unwrap();
    bench
        .service
        .download_validation_file(&"validation-1".into())
        .unwrap();
    assert_eq!(bench.store.task::<UploadTask>(&"ul360-1".into()).unwrap(), before);
}
