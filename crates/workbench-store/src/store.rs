//! The workbench store
//!
//! Single source of truth for the three task collections, the activity
//! log, the archive and the meter data cycles. All mutation goes through
//! named operations; readers get snapshots.
//!
//! # Invariants
//!
//! - `updated_at` of a task never decreases and never precedes `created_at`
//! - Log and archive entries are only ever prepended
//! - A task mutation and the log entry it produces commit under one lock
//! - Task ids are unique within a collection

use crate::activity::ActivityLog;
use crate::archive::Archive;
use crate::clock::{Clock, SystemClock};
use crate::fixtures;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use workbench_core::{
    ActivityLogEntry, ArchiveFile, ArchiveFileId, ExceptionTask, LogEntryId, MeterDataCycle,
    NewActivity, NewArchiveFile, Phase, Result, TaskId, TaskKind, TaskPatch, UpdateOutcome, UploadTask,
    ValidationTask, WorkbenchError, WorkflowTask,
};

/// Everything the store holds
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub uploads: Vec<UploadTask>,
    pub exceptions: Vec<ExceptionTask>,
    pub validations: Vec<ValidationTask>,
    pub activity: ActivityLog,
    pub archive: Archive,
    pub cycles: Vec<MeterDataCycle>,
}

impl StoreState {
    /// First id held twice by one task collection, if any
    #[must_use]
    pub fn duplicate_id(&self) -> Option<(TaskKind, TaskId)> {
        first_duplicate(&self.uploads)
            .or_else(|| first_duplicate(&self.exceptions))
            .or_else(|| first_duplicate(&self.validations))
    }
}

fn first_duplicate<T: WorkflowTask>(tasks: &[T]) -> Option<(TaskKind, TaskId)> {
    let mut seen = HashSet::new();
    tasks
        .iter()
        .find(|t| !seen.insert(t.id()))
        .map(|t| (t.kind(), t.id().clone()))
}

/// Task types with a collection in [`StoreState`]
pub trait StoredTask: WorkflowTask {
    fn collection(state: &StoreState) -> &[Self];
    fn collection_mut(state: &mut StoreState) -> &mut Vec<Self>;
}

impl StoredTask for UploadTask {
    fn collection(state: &StoreState) -> &[Self] {
        &state.uploads
    }

    fn collection_mut(state: &mut StoreState) -> &mut Vec<Self> {
        &mut state.uploads
    }
}

impl StoredTask for ExceptionTask {
    fn collection(state: &StoreState) -> &[Self] {
        &state.exceptions
    }

    fn collection_mut(state: &mut StoreState) -> &mut Vec<Self> {
        &mut state.exceptions
    }
}

impl StoredTask for ValidationTask {
    fn collection(state: &StoreState) -> &[Self] {
        &state.validations
    }

    fn collection_mut(state: &mut StoreState) -> &mut Vec<Self> {
        &mut state.validations
    }
}

/// Shared, lock-guarded workbench state
#[derive(Debug)]
pub struct Store {
    state: RwLock<StoreState>,
    clock: Arc<dyn Clock>,
}

impl Store {
    /// Store over `state`, timestamping with `clock`
    ///
    /// `state` must hold each task id at most once per collection; id
    /// lookups address the first match only.
    ///
    /// # Panics
    ///
    /// In debug builds, when a collection holds the same id twice.
    #[must_use]
    pub fn new(state: StoreState, clock: Arc<dyn Clock>) -> Self {
        if let Some((kind, id)) = state.duplicate_id() {
            tracing::warn!(%kind, %id, "store seeded with duplicate task id");
            if cfg!(debug_assertions) {
                panic!("duplicate {kind} task id: {id}");
            }
        }
        Self {
            state: RwLock::new(state),
            clock,
        }
    }

    /// Store holding the session fixtures
    #[must_use]
    pub fn seeded(clock: Arc<dyn Clock>) -> Self {
        Self::new(fixtures::seed(), clock)
    }

    /// Current time as seen by the store
    #[inline]
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// Patch a task's header fields by id
    ///
    /// Stamps `updated_at` on success. Unknown ids leave the store untouched.
    pub fn update_task(&self, kind: TaskKind, id: &TaskId, patch: TaskPatch) -> UpdateOutcome {
        let outcome = match kind {
            TaskKind::Upload => self.patch::<UploadTask>(id, patch),
            TaskKind::Exception => self.patch::<ExceptionTask>(id, patch),
            TaskKind::Validation => self.patch::<ValidationTask>(id, patch),
        };
        if !outcome.is_found() {
            tracing::debug!(%kind, %id, "update addressed unknown task");
        }
        outcome
    }

    fn patch<T: StoredTask>(&self, id: &TaskId, patch: TaskPatch) -> UpdateOutcome {
        let now = self.clock.now();
        let mut state = self.state.write();
        match T::collection_mut(&mut state).iter_mut().find(|t| t.id() == id) {
            Some(task) => {
                patch.apply_to(task.header_mut());
                task.header_mut().touch(now);
                UpdateOutcome::Found
            }
            None => UpdateOutcome::NotFound,
        }
    }

    /// Apply a workflow step to one task and log it
    ///
    /// `step` runs against a copy of the task. When it succeeds the copy
    /// replaces the original, `updated_at` is stamped and the returned
    /// activity is prepended to the log, all under one write lock. When it
    /// fails nothing changes.
    pub fn transition<T, F>(&self, id: &TaskId, step: F) -> Result<(T, ActivityLogEntry)>
    where
        T: StoredTask,
        F: FnOnce(&mut T) -> Result<NewActivity>,
    {
        let now = self.clock.now();
        let mut state = self.state.write();

        let slot = T::collection_mut(&mut state)
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or_else(|| WorkbenchError::not_found(<T::Phase as Phase>::KIND, id))?;

        let mut draft = slot.clone();
        let activity = step(&mut draft)?;
        draft.header_mut().touch(now);
        *slot = draft.clone();

        let entry = activity.into_entry(LogEntryId::generate(), now);
        state.activity.prepend(entry.clone());
        Ok((draft, entry))
    }

    /// Build an activity log entry and prepend it
    pub fn append_activity(&self, activity: NewActivity) -> ActivityLogEntry {
        let entry = activity.into_entry(LogEntryId::generate(), self.clock.now());
        self.state.write().activity.prepend(entry.clone());
        entry
    }

    /// Build an archive record and prepend it
    pub fn append_archive_file(&self, file: NewArchiveFile) -> ArchiveFile {
        let record = file.into_file(ArchiveFileId::generate(), self.clock.now());
        self.state.write().archive.prepend(record.clone());
        record
    }

    /// Archive a file and log the activity that produced it, atomically
    pub fn archive_with_activity(
        &self,
        file: NewArchiveFile,
        activity: NewActivity,
    ) -> (ArchiveFile, ActivityLogEntry) {
        let now = self.clock.now();
        let record = file.into_file(ArchiveFileId::generate(), now);
        let entry = activity.into_entry(LogEntryId::generate(), now);

        let mut state = self.state.write();
        state.archive.prepend(record.clone());
        state.activity.prepend(entry.clone());
        (record, entry)
    }

    /// Run `f` against the current state without cloning it
    pub fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        f(&self.state.read())
    }

    /// Copy of every task of type `T`
    #[must_use]
    pub fn tasks<T: StoredTask>(&self) -> Vec<T> {
        self.read(|s| T::collection(s).to_vec())
    }

    /// Copy of one task, if present
    #[must_use]
    pub fn task<T: StoredTask>(&self, id: &TaskId) -> Option<T> {
        self.read(|s| T::collection(s).iter().find(|t| t.id() == id).cloned())
    }

    #[must_use]
    pub fn uploads(&self) -> Vec<UploadTask> {
        self.tasks()
    }

    #[must_use]
    pub fn exceptions(&self) -> Vec<ExceptionTask> {
        self.tasks()
    }

    #[must_use]
    pub fn validations(&self) -> Vec<ValidationTask> {
        self.tasks()
    }

    /// Activity log, newest first
    #[must_use]
    pub fn activity(&self) -> Vec<ActivityLogEntry> {
        self.read(|s| s.activity.iter().cloned().collect())
    }

    /// Archive, newest first
    #[must_use]
    pub fn archive(&self) -> Vec<ArchiveFile> {
        self.read(|s| s.archive.iter().cloned().collect())
    }

    #[must_use]
    pub fn cycles(&self) -> Vec<MeterDataCycle> {
        self.read(|s| s.cycles.clone())
    }

    /// Full copy of the current state
    #[must_use]
    pub fn snapshot(&self) -> StoreState {
        self.read(StoreState::clone)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::seeded(Arc::new(SystemClock))
    }
}
