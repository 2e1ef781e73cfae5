//! Derived counts for navigation badges and the dashboard
//!
//! Pure functions of the store state, recomputed on every read.

use crate::store::{Store, StoreState, StoredTask};
use serde::Serialize;
use workbench_core::{TaskKind, TaskStatus, WorkflowTask};

/// Number of tasks needing attention per navigation entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BadgeCounts {
    /// Upload tasks that are pending or need attention
    pub uploads: usize,
    /// Exception tasks needing attention
    pub exceptions: usize,
    /// Validation tasks needing attention
    pub validations: usize,
}

impl BadgeCounts {
    #[must_use]
    pub fn from_state(state: &StoreState) -> Self {
        Self {
            uploads: count_with_status(&state.uploads, &[TaskStatus::Attention, TaskStatus::Pending]),
            exceptions: count_with_status(&state.exceptions, &[TaskStatus::Attention]),
            validations: count_with_status(&state.validations, &[TaskStatus::Attention]),
        }
    }

    #[must_use]
    pub fn get(&self, kind: TaskKind) -> usize {
        match kind {
            TaskKind::Upload => self.uploads,
            TaskKind::Exception => self.exceptions,
            TaskKind::Validation => self.validations,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.uploads + self.exceptions + self.validations
    }
}

fn count_with_status<T: WorkflowTask>(tasks: &[T], statuses: &[TaskStatus]) -> usize {
    tasks.iter().filter(|t| statuses.contains(&t.status())).count()
}

/// Task and meter totals for one task kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindTotals {
    pub tasks: usize,
    pub meters: u64,
}

impl KindTotals {
    fn of<T: StoredTask>(state: &StoreState) -> Self {
        let tasks = T::collection(state);
        Self {
            tasks: tasks.len(),
            meters: tasks.iter().map(|t| u64::from(t.tracked_meters())).sum(),
        }
    }
}

/// Dashboard workflow-stage totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardTotals {
    pub uploads: KindTotals,
    pub exceptions: KindTotals,
    pub validations: KindTotals,
}

impl DashboardTotals {
    #[must_use]
    pub fn from_state(state: &StoreState) -> Self {
        Self {
            uploads: KindTotals::of::<workbench_core::UploadTask>(state),
            exceptions: KindTotals::of::<workbench_core::ExceptionTask>(state),
            validations: KindTotals::of::<workbench_core::ValidationTask>(state),
        }
    }

    #[must_use]
    pub fn get(&self, kind: TaskKind) -> KindTotals {
        match kind {
            TaskKind::Upload => self.uploads,
            TaskKind::Exception => self.exceptions,
            TaskKind::Validation => self.validations,
        }
    }
}

impl Store {
    /// Badge counts from the current state
    #[must_use]
    pub fn badges(&self) -> BadgeCounts {
        let counts = self.read(BadgeCounts::from_state);
        tracing::debug!(?counts, "computed badge counts");
        counts
    }

    /// Dashboard totals from the current state
    #[must_use]
    pub fn totals(&self) -> DashboardTotals {
        self.read(DashboardTotals::from_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn seeded_badges() {
        let counts = BadgeCounts::from_state(&fixtures::seed());
        assert_eq!(
            counts,
            BadgeCounts {
                uploads: 1,
                exceptions: 1,
                validations: 1,
            }
        );
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn seeded_totals() {
        let totals = DashboardTotals::from_state(&fixtures::seed());
        assert_eq!(totals.get(TaskKind::Upload), KindTotals { tasks: 1, meters: 608 });
        assert_eq!(totals.get(TaskKind::Exception), KindTotals { tasks: 1, meters: 30 });
        assert_eq!(totals.get(TaskKind::Validation), KindTotals { tasks: 1, meters: 8 });
    }

    #[test]
    fn upload_badge_counts_pending_and_attention_only() {
        let mut state = fixtures::seed();
        let template = state.uploads[0].clone();
        for (i, status) in [
            TaskStatus::Attention,
            TaskStatus::Completed,
            TaskStatus::Stale,
            TaskStatus::InProgress,
        ]
        .into_iter()
        .enumerate()
        {
            let mut task = template.clone();
            task.header.id = format!("ul360-extra-{i}").into();
            task.header.status = status;
            state.uploads.push(task);
        }
        // seeded pending + added attention
        assert_eq!(BadgeCounts::from_state(&state).uploads, 2);
    }
}
