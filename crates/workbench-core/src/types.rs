//! Core types for the workbench
//!
//! Defines the shared vocabulary of the workflow core:
//! - Identifiers for tasks, log entries, archive files and cycles
//! - Markets and task/cycle statuses
//! - Activity log entries and archive file records
//! - Partial task updates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Generate a fresh, sortable identifier
            #[inline]
            #[must_use]
            pub fn generate() -> Self {
                Self(format!("{}-{}", $prefix, Ulid::new().to_string().to_lowercase()))
            }

            /// Borrow the raw identifier
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }
    };
}

string_id!(
    /// Task identifier, e.g. `ul360-1`
    TaskId,
    "task"
);
string_id!(
    /// Activity log entry identifier
    LogEntryId,
    "log"
);
string_id!(
    /// Archive file identifier
    ArchiveFileId,
    "file"
);
string_id!(
    /// Meter data cycle identifier
    CycleId,
    "cycle"
);

/// Regional dataset a task, file or log entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Market {
    UK,
    CZ,
    DE,
    ES,
    FR,
    IT,
    NL,
    PL,
}

impl Market {
    /// All markets in display order
    pub const ALL: [Market; 8] = [
        Market::UK,
        Market::CZ,
        Market::DE,
        Market::ES,
        Market::FR,
        Market::IT,
        Market::NL,
        Market::PL,
    ];

    /// Two-letter market code
    #[inline]
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Market::UK => "UK",
            Market::CZ => "CZ",
            Market::DE => "DE",
            Market::ES => "ES",
            Market::FR => "FR",
            Market::IT => "IT",
            Market::NL => "NL",
            Market::PL => "PL",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

impl FromStr for Market {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Market::ALL
            .into_iter()
            .find(|m| m.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant::new("market", s))
    }
}

/// Parse failure for the string-backed enums in this module
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {what}: {value}")]
pub struct UnknownVariant {
    what: &'static str,
    value: String,
}

impl UnknownVariant {
    #[must_use]
    pub fn new(what: &'static str, value: &str) -> Self {
        Self {
            what,
            value: value.to_string(),
        }
    }
}

/// Task status as shown on cards and badges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Attention,
    Stale,
}

impl TaskStatus {
    /// Wire label (`in-progress`, ...)
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Attention => "attention",
            TaskStatus::Stale => "stale",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Freshness of a market's meter data cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleStatus {
    Current,
    Pending,
    Stale,
}

impl fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            CycleStatus::Current => "current",
            CycleStatus::Pending => "pending",
            CycleStatus::Stale => "stale",
        })
    }
}

/// The three task collections held by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    Upload,
    Exception,
    Validation,
}

impl TaskKind {
    /// All kinds in navigation order
    pub const ALL: [TaskKind; 3] = [TaskKind::Upload, TaskKind::Exception, TaskKind::Validation];
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            TaskKind::Upload => "upload",
            TaskKind::Exception => "exception",
            TaskKind::Validation => "validation",
        })
    }
}

impl FromStr for TaskKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upload" | "ul360" => Ok(TaskKind::Upload),
            "exception" | "meter-exception" => Ok(TaskKind::Exception),
            "validation" => Ok(TaskKind::Validation),
            _ => Err(UnknownVariant::new("task kind", s)),
        }
    }
}

/// Who performed a logged action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Actor {
    Agent,
    Human,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Actor::Agent => "Agent",
            Actor::Human => "Human",
        })
    }
}

/// Immutable audit record of one action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub id: LogEntryId,
    pub timestamp: DateTime<Utc>,
    pub actor: Actor,
    pub username: Option<String>,
    pub action: String,
    pub market: Market,
    pub task_id: Option<TaskId>,
    pub details: Option<String>,
}

impl ActivityLogEntry {
    /// Display name of the actor: the username for humans, `Agent` otherwise
    #[must_use]
    pub fn actor_label(&self) -> &str {
        match (self.actor, self.username.as_deref()) {
            (Actor::Human, Some(name)) => name,
            (Actor::Human, None) => "Human",
            (Actor::Agent, _) => "Agent",
        }
    }
}

/// Caller-supplied part of an activity log entry
///
/// The store adds the id and timestamp when appending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub actor: Actor,
    pub username: Option<String>,
    pub action: String,
    pub market: Market,
    pub task_id: Option<TaskId>,
    pub details: Option<String>,
}

impl NewActivity {
    /// Activity performed by the automated agent
    #[inline]
    #[must_use]
    pub fn agent(action: impl Into<String>, market: Market) -> Self {
        Self {
            actor: Actor::Agent,
            username: None,
            action: action.into(),
            market,
            task_id: None,
            details: None,
        }
    }

    /// Activity performed by a human
    #[inline]
    #[must_use]
    pub fn human(action: impl Into<String>, market: Market) -> Self {
        Self {
            actor: Actor::Human,
            ..Self::agent(action, market)
        }
    }

    /// With the acting username
    #[inline]
    #[must_use]
    pub fn by(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// With the related task
    #[inline]
    #[must_use]
    pub fn for_task(mut self, task_id: TaskId) -> Self {
        self.task_id = Some(task_id);
        self
    }

    /// With free-text details
    #[inline]
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Complete the entry with an id and timestamp
    #[must_use]
    pub fn into_entry(self, id: LogEntryId, timestamp: DateTime<Utc>) -> ActivityLogEntry {
        ActivityLogEntry {
            id,
            timestamp,
            actor: self.actor,
            username: self.username,
            action: self.action,
            market: self.market,
            task_id: self.task_id,
            details: self.details,
        }
    }
}

/// Category of an archived file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveFileType {
    Upload,
    Exception,
    Audit,
}

impl fmt::Display for ArchiveFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            ArchiveFileType::Upload => "upload",
            ArchiveFileType::Exception => "exception",
            ArchiveFileType::Audit => "audit",
        })
    }
}

impl FromStr for ArchiveFileType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upload" => Ok(ArchiveFileType::Upload),
            "exception" => Ok(ArchiveFileType::Exception),
            "audit" => Ok(ArchiveFileType::Audit),
            _ => Err(UnknownVariant::new("file type", s)),
        }
    }
}

/// Record describing a generated or uploaded file artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveFile {
    pub id: ArchiveFileId,
    pub filename: String,
    pub cycle: Option<String>,
    pub market: Market,
    pub generated_at: DateTime<Utc>,
    pub size: String,
    pub file_type: ArchiveFileType,
    pub download_url: String,
}

/// Caller-supplied part of an archive record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArchiveFile {
    pub filename: String,
    pub cycle: Option<String>,
    pub market: Market,
    pub size: String,
    pub file_type: ArchiveFileType,
    pub download_url: String,
}

impl NewArchiveFile {
    /// Complete the record with an id and generation time
    #[must_use]
    pub fn into_file(self, id: ArchiveFileId, generated_at: DateTime<Utc>) -> ArchiveFile {
        ArchiveFile {
            id,
            filename: self.filename,
            cycle: self.cycle,
            market: self.market,
            generated_at,
            size: self.size,
            file_type: self.file_type,
            download_url: self.download_url,
        }
    }
}

/// Monthly meter data import for one market
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterDataCycle {
    pub id: CycleId,
    pub market: Market,
    /// e.g. `December 2025`
    pub period: String,
    /// `DD/MM/YY`
    pub date: String,
    pub status: CycleStatus,
    /// 0..=100
    pub quality_score: u8,
}

/// Fields shared by every task variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHeader {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub market: Market,
    pub status: TaskStatus,
    pub assignee: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub meter_count: Option<u32>,
    pub error_count: Option<u32>,
}

impl TaskHeader {
    /// New header with both timestamps set to `created_at`
    #[must_use]
    pub fn new(
        id: impl Into<TaskId>,
        title: impl Into<String>,
        market: Market,
        status: TaskStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            market,
            status,
            assignee: None,
            created_at,
            updated_at: created_at,
            meter_count: None,
            error_count: None,
        }
    }

    /// Refresh `updated_at`, never moving it backwards or before creation
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.updated_at).max(self.created_at);
    }
}

/// Partial update of a task's header fields
///
/// Only `Some` fields are written. Workflow progress is not patchable here;
/// it moves through the named transitions in [`crate::workflow`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub assignee: Option<String>,
    pub meter_count: Option<u32>,
    pub error_count: Option<u32>,
}

impl TaskPatch {
    /// Empty patch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With status
    #[inline]
    #[must_use]
    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// With assignee
    #[inline]
    #[must_use]
    pub fn assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// With meter count
    #[inline]
    #[must_use]
    pub fn meter_count(mut self, count: u32) -> Self {
        self.meter_count = Some(count);
        self
    }

    /// With error count
    #[inline]
    #[must_use]
    pub fn error_count(mut self, count: u32) -> Self {
        self.error_count = Some(count);
        self
    }

    /// With title
    #[inline]
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// True when no field would change
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Write the present fields into `header`
    pub fn apply_to(self, header: &mut TaskHeader) {
        if let Some(title) = self.title {
            header.title = title;
        }
        if let Some(description) = self.description {
            header.description = description;
        }
        if let Some(status) = self.status {
            header.status = status;
        }
        if let Some(assignee) = self.assignee {
            header.assignee = Some(assignee);
        }
        if let Some(count) = self.meter_count {
            header.meter_count = Some(count);
        }
        if let Some(count) = self.error_count {
            header.error_count = Some(count);
        }
    }
}

/// Result of an update addressed by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[must_use]
pub enum UpdateOutcome {
    Found,
    NotFound,
}

impl UpdateOutcome {
    /// Whether the addressed task existed
    #[inline]
    pub fn is_found(self) -> bool {
        matches!(self, UpdateOutcome::Found)
    }
}
