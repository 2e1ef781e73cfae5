//! Workbench configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use workbench_core::WorkbenchError;

/// Runtime settings for the workflow service and CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkbenchConfig {
    /// Username stamped on human activity
    pub current_user: String,
    /// Simulated agent time to generate an exception file
    pub generate_delay_ms: u64,
    /// Simulated agent time to reprocess meter data
    pub reprocess_delay_ms: u64,
    /// Simulated agent time to answer an audit request
    pub audit_delay_ms: u64,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl WorkbenchConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With current user
    #[inline]
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.current_user = user.into();
        self
    }

    /// With all simulated delays set to `ms`
    #[inline]
    #[must_use]
    pub fn with_uniform_delay(mut self, ms: u64) -> Self {
        self.generate_delay_ms = ms;
        self.reprocess_delay_ms = ms;
        self.audit_delay_ms = ms;
        self
    }

    /// Parse from a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, WorkbenchError> {
        toml::from_str(source).map_err(|e| WorkbenchError::Config(e.to_string()))
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorkbenchError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| WorkbenchError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    #[inline]
    #[must_use]
    pub fn generate_delay(&self) -> Duration {
        Duration::from_millis(self.generate_delay_ms)
    }

    #[inline]
    #[must_use]
    pub fn reprocess_delay(&self) -> Duration {
        Duration::from_millis(self.reprocess_delay_ms)
    }

    #[inline]
    #[must_use]
    pub fn audit_delay(&self) -> Duration {
        Duration::from_millis(self.audit_delay_ms)
    }
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            current_user: "Sarah Mitchell".to_string(),
            generate_delay_ms: 1500,
            reprocess_delay_ms: 2000,
            audit_delay_ms: 2000,
            log_level: "info".to_string(),
        }
    }
}
