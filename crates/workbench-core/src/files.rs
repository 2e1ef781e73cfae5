//! Attached-file handling
//!
//! Files never pass through the core; only their name and size do. Each
//! workflow step accepts a fixed set of extensions.

use crate::error::InputError;
use crate::types::ArchiveFileType;
use serde::{Deserialize, Serialize};

/// Reference to a user-selected file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,
    pub size_bytes: u64,
}

impl FileRef {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
        }
    }

    /// Lowercased extension including the dot, if any
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        self.name
            .rfind('.')
            .map(|idx| self.name[idx..].to_ascii_lowercase())
    }
}

/// Spreadsheets for error reports and corrected registries
pub const SPREADSHEET: &[&str] = &[".xlsx", ".xls"];

/// Manual audit evidence
pub const AUDIT_EVIDENCE: &[&str] = &[".xlsx", ".xls", ".pdf"];

/// Raw meter data intake
pub const METER_DATA: &[&str] = &[".xlsx", ".xls", ".csv"];

/// Require a file whose extension is in `accepted`
pub fn ensure_accepted<'a>(
    file: Option<&'a FileRef>,
    accepted: &[&str],
) -> Result<&'a FileRef, InputError> {
    let file = file.ok_or(InputError::MissingFile)?;
    match file.extension() {
        Some(ext) if accepted.contains(&ext.as_str()) => Ok(file),
        _ => Err(InputError::UnsupportedFileType {
            filename: file.name.clone(),
            accepted: accepted.join(", "),
        }),
    }
}

/// Archive category inferred from a filename
#[must_use]
pub fn classify(filename: &str) -> ArchiveFileType {
    let lower = filename.to_lowercase();
    if lower.contains("exception") {
        ArchiveFileType::Exception
    } else if lower.contains("audit") {
        ArchiveFileType::Audit
    } else {
        ArchiveFileType::Upload
    }
}

/// Size label as shown in the archive (`456.0 KB`, `2.3 MB`)
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_case_insensitive() {
        assert_eq!(FileRef::new("Report.XLSX", 1).extension().as_deref(), Some(".xlsx"));
        assert_eq!(FileRef::new("noext", 1).extension(), None);
    }

    #[test]
    fn accepts_listed_extensions_only() {
        let sheet = FileRef::new("errors.xls", 10);
        assert!(ensure_accepted(Some(&sheet), SPREADSHEET).is_ok());

        let pdf = FileRef::new("audit.pdf", 10);
        assert!(ensure_accepted(Some(&pdf), AUDIT_EVIDENCE).is_ok());
        assert_eq!(
            ensure_accepted(Some(&pdf), SPREADSHEET).unwrap_err(),
            InputError::UnsupportedFileType {
                filename: "audit.pdf".into(),
                accepted: ".xlsx, .xls".into(),
            }
        );

        assert_eq!(ensure_accepted(None, METER_DATA).unwrap_err(), InputError::MissingFile);
    }

    #[test]
    fn classification_follows_filename() {
        assert_eq!(classify("CZ Gas Exception Report.xlsx"), ArchiveFileType::Exception);
        assert_eq!(classify("uk-AUDIT.pdf"), ArchiveFileType::Audit);
        assert_eq!(classify("uk-dec-2025.csv"), ArchiveFileType::Upload);
    }

    #[test]
    fn size_labels() {
        assert_eq!(format_size(466_944), "456.0 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_size(2_411_725), "2.3 MB");
    }
}
