//! Testing utilities for the workbench workspace
//!
//! Shared builders, clocks and assertions for integration tests.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use workbench_core::{ActivityLogEntry, FileRef};
use workbench_store::{Delay, ManualClock, Store, WorkbenchConfig, WorkflowService};

/// Start of every test session: 2026-01-21 09:00 UTC, after all fixture dates
pub fn session_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 21, 9, 0, 0).unwrap()
}

/// Delay that returns immediately and remembers what it was asked for
#[derive(Debug, Default)]
pub struct RecordingDelay {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingDelay {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().clone()
    }
}

#[async_trait]
impl Delay for RecordingDelay {
    async fn wait(&self, duration: Duration) {
        self.waits.lock().push(duration);
    }
}

/// Seeded store, its manual clock and a service that never sleeps
pub struct TestBench {
    pub clock: Arc<ManualClock>,
    pub store: Arc<Store>,
    pub delay: Arc<RecordingDelay>,
    pub service: WorkflowService,
}

impl TestBench {
    pub fn seeded() -> Self {
        Self::with_config(WorkbenchConfig::default())
    }

    pub fn with_config(config: WorkbenchConfig) -> Self {
        let clock = Arc::new(ManualClock::new(session_start()));
        let store = Arc::new(Store::seeded(clock.clone()));
        let delay = Arc::new(RecordingDelay::default());
        let service = WorkflowService::with_delay(store.clone(), config, delay.clone());
        Self {
            clock,
            store,
            delay,
            service,
        }
    }

    /// Move the clock forward by `minutes`
    pub fn tick(&self, minutes: i64) {
        self.clock.advance(TimeDelta::minutes(minutes));
    }

    pub fn log_len(&self) -> usize {
        self.store.activity().len()
    }

    /// The `n` most recent log entries, newest first
    pub fn latest(&self, n: usize) -> Vec<ActivityLogEntry> {
        self.store.activity().into_iter().take(n).collect()
    }
}

pub fn spreadsheet(name: &str) -> FileRef {
    FileRef::new(format!("{name}.xlsx"), 64 * 1024)
}

pub fn pdf(name: &str) -> FileRef {
    FileRef::new(format!("{name}.pdf"), 128 * 1024)
}

/// Assert log actions, newest first
pub fn assert_actions(entries: &[ActivityLogEntry], expected: &[&str]) {
    let actions: Vec<&str> = entries.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, expected);
}
