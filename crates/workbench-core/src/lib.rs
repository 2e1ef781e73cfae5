//! Workbench Core - domain model of the Sustainability Workbench
//!
//! The vocabulary shared by the store and its callers:
//! - Markets, statuses and identifiers
//! - Upload, exception and validation tasks
//! - Per-kind workflow phases with explicit transition tables
//! - Activity log entries and archive file records
//! - Error taxonomy for rejected steps and invalid input
//!
//! # Example
//!
//! ```rust
//! use workbench_core::prelude::*;
//! use workbench_core::workflow::UploadAction;
//! use chrono::Utc;
//!
//! let header = TaskHeader::new("ul360-1", "Upload to UL360", Market::UK, TaskStatus::Pending, Utc::now());
//! let mut task = UploadTask::new(header);
//!
//! assert!(task.advance(UploadAction::RecordSuccess).is_err());
//! task.advance(UploadAction::Download).unwrap();
//! task.advance(UploadAction::RecordSuccess).unwrap();
//! assert_eq!(task.status(), TaskStatus::Completed);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod files;
pub mod task;
pub mod types;
pub mod workflow;

pub use error::{InputError, Result, TransitionError, WorkbenchError};
pub use files::FileRef;
pub use task::{ExceptionTask, UploadTask, ValidationTask, WorkflowTask};
pub use types::{
    ActivityLogEntry, Actor, ArchiveFile, ArchiveFileId, ArchiveFileType, CycleId, CycleStatus,
    LogEntryId, Market, MeterDataCycle, NewActivity, NewArchiveFile, TaskHeader, TaskId,
    TaskKind, TaskPatch, TaskStatus, UnknownVariant, UpdateOutcome,
};
pub use workflow::{ExceptionPhase, Phase, UploadPhase, ValidationPhase};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the workbench model
    pub use crate::{
        Actor, ExceptionTask, Market, NewActivity, Phase, TaskHeader, TaskId, TaskKind,
        TaskPatch, TaskStatus, UploadTask, ValidationTask, WorkbenchError, WorkflowTask,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
