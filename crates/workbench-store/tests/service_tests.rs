use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use workbench_core::{FileRef, Market, TaskId, TaskKind, TaskPatch, TaskStatus, UpdateOutcome};
use workbench_store::{
    dispatch, run_scenario, ActivityFilter, ActorFilter, Command, ManualClock, Outcome, Scenario,
    Store, WorkbenchConfig, WorkflowService,
};
use workbench_test_utils::{session_start, spreadsheet, TestBench};

#[test]
fn config_file_drives_service() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "current_user = \"James Thompson\"\ngenerate_delay_ms = 5\nlog_level = \"debug\""
    )
    .unwrap();

    let config = WorkbenchConfig::load(file.path()).unwrap();
    assert_eq!(config.generate_delay(), Duration::from_millis(5));

    let bench = TestBench::with_config(config);
    assert_eq!(bench.service.current_user(), "James Thompson");
}

#[test]
fn missing_config_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = WorkbenchConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().starts_with("configuration error"));
}

#[tokio::test]
async fn agent_steps_wait_configured_time() {
    let bench = TestBench::seeded();
    let id = TaskId::from("exception-1");

    bench.service.generate_exception_file(&id).await.unwrap();
    bench
        .service
        .import_registry(&id, Some(&spreadsheet("registry")))
        .unwrap();
    bench.service.reprocess(&id).await.unwrap();
    bench.service.request_audit(Market::UK, "status?").await.unwrap();

    assert_eq!(
        bench.delay.waits(),
        vec![
            Duration::from_millis(1500),
            Duration::from_millis(2000),
            Duration::from_millis(2000),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn tokio_delay_runs_on_virtual_time() {
    let clock = Arc::new(ManualClock::new(session_start()));
    let store = Arc::new(Store::seeded(clock));
    let service = WorkflowService::new(store, WorkbenchConfig::default());

    let started = tokio::time::Instant::now();
    service
        .generate_exception_file(&"exception-1".into())
        .await
        .unwrap();
    assert!(started.elapsed() >= Duration::from_millis(1500));
}

#[tokio::test]
async fn dispatch_routes_every_kind() {
    let bench = TestBench::seeded();

    let outcome = dispatch(
        &bench.service,
        Command::UpdateTask {
            kind: TaskKind::Validation,
            id: "validation-1".into(),
            patch: TaskPatch::new().assignee("James Thompson"),
        },
    )
    .await
    .unwrap();
    assert_eq!(outcome, Outcome::Updated(UpdateOutcome::Found));

    let outcome = dispatch(
        &bench.service,
        Command::UpdateTask {
            kind: TaskKind::Upload,
            id: "ul360-404".into(),
            patch: TaskPatch::new().status(TaskStatus::Stale),
        },
    )
    .await
    .unwrap();
    assert_eq!(outcome, Outcome::Updated(UpdateOutcome::NotFound));

    let outcome = dispatch(
        &bench.service,
        Command::SwitchUser {
            username: "Emma Rodriguez".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(outcome, Outcome::UserSwitched("Emma Rodriguez".into()));

    let outcome = dispatch(
        &bench.service,
        Command::IngestMeterFile {
            file: FileRef::new("DE Audit Readings.xlsx", 512),
            market: Market::DE,
        },
    )
    .await
    .unwrap();
    let Outcome::Archived(file) = outcome else {
        panic!("expected an archived file, got {outcome:?}");
    };
    assert_eq!(file.size, "0.5 KB");

    let human = ActivityFilter {
        market: Some(Market::DE),
        actor: ActorFilter::User("Emma Rodriguez".into()),
    };
    let hits = bench.store.read(|s| s.activity.filtered(&human).count());
    assert_eq!(hits, 1);
}

#[tokio::test]
async fn dispatch_propagates_rejections() {
    let bench = TestBench::seeded();
    let err = dispatch(
        &bench.service,
        Command::Reprocess {
            id: "exception-1".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(err.is_precondition_failure());

    let err = dispatch(
        &bench.service,
        Command::RequestAudit {
            market: Market::UK,
            query: String::new(),
        },
    )
    .await
    .unwrap_err();
    assert!(err.is_user_correctable());
}

#[tokio::test]
async fn scenarios_record_guards_and_progress() {
    for (scenario, rejected, entries) in [
        (Scenario::Upload, 1, 3),
        (Scenario::Exception, 1, 3),
        (Scenario::Validation, 1, 2),
    ] {
        let bench = TestBench::seeded();
        let report = run_scenario(&bench.service, scenario).await;

        assert_eq!(report.rejected(), rejected, "{scenario}");
        assert_eq!(report.new_entries.len(), entries, "{scenario}");
        assert!(report.steps.last().is_some_and(|s| s.result.is_ok()));

        let text = report.generate_text();
        assert!(text.contains("rejected"));
        assert!(text.contains(&format!("=== Scenario: {scenario} ===")));
    }
}

#[tokio::test]
async fn audit_reflects_completed_exceptions() {
    let bench = TestBench::seeded();
    let id = TaskId::from("exception-1");
    bench.service.generate_exception_file(&id).await.unwrap();
    bench
        .service
        .import_registry(&id, Some(&spreadsheet("registry")))
        .unwrap();
    bench.service.reprocess(&id).await.unwrap();

    let report = bench.service.request_audit(Market::UK, "open items").await.unwrap();
    assert!(report.response.contains("Meters missing from registry: 0"));
    assert_eq!(report.query, "open items");
}
