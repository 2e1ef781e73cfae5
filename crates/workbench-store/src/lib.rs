//! Workbench Store - state container and workflow service
//!
//! Holds the upload, exception and validation task collections, the
//! activity log, the file archive and the meter data cycles for one
//! session. On top of the store sits the workflow service, which exposes
//! each user or agent action as a named operation.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use workbench_store::prelude::*;
//!
//! let store = Arc::new(Store::default());
//! let service = WorkflowService::new(store.clone(), WorkbenchConfig::default());
//!
//! service.download_upload_file(&"ul360-1".into())?;
//! service.record_upload_success(&"ul360-1".into())?;
//!
//! assert_eq!(store.badges().uploads, 0);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// State
pub mod activity;
pub mod archive;
pub mod fixtures;
pub mod store;
pub mod summary;

// Behaviour
pub mod clock;
pub mod command;
pub mod config;
pub mod scenario;
pub mod workflow;

// Re-exports
pub use activity::{ActivityFilter, ActivityLog, ActorFilter};
pub use archive::{Archive, ArchiveFilter};
pub use clock::{Clock, Delay, ManualClock, NoDelay, SystemClock, TokioDelay};
pub use command::{dispatch, Command, Outcome};
pub use config::WorkbenchConfig;
pub use scenario::{run_scenario, Scenario, ScenarioReport};
pub use store::{Store, StoreState, StoredTask};
pub use summary::{BadgeCounts, DashboardTotals, KindTotals};
pub use workflow::{AuditReport, WorkflowService};

/// Common imports for driving the workbench
pub mod prelude {
    pub use crate::{
        BadgeCounts, Command, Outcome, Store, WorkbenchConfig, WorkflowService,
    };
    pub use std::sync::Arc;
    pub use workbench_core::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
