//! Scripted walkthroughs of each workflow
//!
//! A scenario is a fixed command script run against a service. Every step
//! is recorded with its outcome, rejected steps included, so the report
//! shows both the happy path and the guards along it.

use crate::command::{dispatch, Command, Outcome};
use crate::workflow::WorkflowService;
use std::fmt::{self, Write as _};
use std::str::FromStr;
use workbench_core::{ActivityLogEntry, FileRef, UnknownVariant};

/// The built-in scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Download, partial upload, error report
    Upload,
    /// Generate, reprocess too early, import, reprocess
    Exception,
    /// Submit too early, download, submit
    Validation,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Upload, Scenario::Exception, Scenario::Validation];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Scenario::Upload => "upload",
            Scenario::Exception => "exception",
            Scenario::Validation => "validation",
        }
    }

    /// Commands the scenario issues, in order
    #[must_use]
    pub fn script(self) -> Vec<Command> {
        match self {
            Scenario::Upload => vec![
                Command::RecordUploadSuccess { id: "ul360-1".into() },
                Command::DownloadUploadFile { id: "ul360-1".into() },
                Command::RecordUploadPartial {
                    id: "ul360-1".into(),
                    error_count: Some(12),
                },
                Command::UploadErrorReport {
                    id: "ul360-1".into(),
                    file: Some(FileRef::new("UK Upload Errors.xlsx", 48 * 1024)),
                },
            ],
            Scenario::Exception => vec![
                Command::GenerateExceptionFile { id: "exception-1".into() },
                Command::Reprocess { id: "exception-1".into() },
                Command::ImportRegistry {
                    id: "exception-1".into(),
                    file: Some(FileRef::new("UK Registry Export.xlsx", 210 * 1024)),
                },
                Command::Reprocess { id: "exception-1".into() },
            ],
            Scenario::Validation => vec![
                Command::SubmitFix {
                    id: "validation-1".into(),
                    note: "Corrected meter readings".into(),
                    file: Some(FileRef::new("Manual Audit.pdf", 96 * 1024)),
                },
                Command::DownloadValidationFile { id: "validation-1".into() },
                Command::SubmitFix {
                    id: "validation-1".into(),
                    note: "Corrected meter readings".into(),
                    file: Some(FileRef::new("Manual Audit.pdf", 96 * 1024)),
                },
            ],
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sc| sc.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant::new("scenario", s))
    }
}

/// One executed step
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub command: &'static str,
    pub result: Result<String, String>,
}

/// Everything a scenario run did
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    pub steps: Vec<StepRecord>,
    /// Log entries written during the run, newest first
    pub new_entries: Vec<ActivityLogEntry>,
}

impl ScenarioReport {
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.steps.iter().filter(|s| s.result.is_err()).count()
    }

    /// Plain-text rendering for the terminal
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut report = String::new();

        let _ = writeln!(report, "=== Scenario: {} ===\n", self.scenario);
        for (i, step) in self.steps.iter().enumerate() {
            match &step.result {
                Ok(summary) => {
                    let _ = writeln!(report, "{}. {} -> ok: {summary}", i + 1, step.command);
                }
                Err(reason) => {
                    let _ = writeln!(report, "{}. {} -> rejected: {reason}", i + 1, step.command);
                }
            }
        }

        let _ = writeln!(report, "\n=== Activity ({} new) ===", self.new_entries.len());
        for entry in &self.new_entries {
            let _ = writeln!(
                report,
                "{} [{}] {}: {}",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                entry.actor_label(),
                entry.action,
                entry.details.as_deref().unwrap_or("-"),
            );
        }

        report
    }
}

fn summarize(outcome: &Outcome) -> String {
    use workbench_core::{Phase, WorkflowTask};
    match outcome {
        Outcome::Updated(found) => format!("{found:?}"),
        Outcome::Upload(t) => format!("{} is {} ({})", t.id(), t.status(), t.phase.label()),
        Outcome::Exception(t) => format!("{} is {} ({})", t.id(), t.status(), t.phase.label()),
        Outcome::Validation(t) => format!("{} is {} ({})", t.id(), t.status(), t.phase.label()),
        Outcome::Logged(entry) => format!("logged \"{}\"", entry.action),
        Outcome::Archived(file) => format!("archived {}", file.filename),
        Outcome::Audit(report) => format!("audit for {}", report.market),
        Outcome::UserSwitched(user) => format!("now acting as {user}"),
    }
}

/// Run `scenario` against `service`, recording every step
pub async fn run_scenario(service: &WorkflowService, scenario: Scenario) -> ScenarioReport {
    let log_before = service.store().read(|s| s.activity.len());
    let mut steps = Vec::new();

    for command in scenario.script() {
        let name = command.name();
        let result = dispatch(service, command)
            .await
            .map(|outcome| summarize(&outcome))
            .map_err(|e| e.to_string());
        steps.push(StepRecord {
            command: name,
            result,
        });
    }

    let log = service.store().activity();
    let added = log.len().saturating_sub(log_before);
    tracing::info!(%scenario, steps = steps.len(), entries = added, "scenario finished");

    ScenarioReport {
        scenario,
        steps,
        new_entries: log.into_iter().take(added).collect(),
    }
}
