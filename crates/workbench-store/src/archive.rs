use std::collections::VecDeque;
use workbench_core::{ArchiveFile, ArchiveFileType, Market};

/// Append-only file archive, newest first
#[derive(Debug, Clone, Default)]
pub struct Archive {
    files: VecDeque<ArchiveFile>,
}

impl Archive {
    #[must_use]
    pub fn from_files(files: impl IntoIterator<Item = ArchiveFile>) -> Self {
        Self {
            files: files.into_iter().collect(),
        }
    }

    pub fn prepend(&mut self, file: ArchiveFile) {
        self.files.push_front(file);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArchiveFile> {
        self.files.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn filtered<'a>(
        &'a self,
        filter: &'a ArchiveFilter,
    ) -> impl Iterator<Item = &'a ArchiveFile> + 'a {
        self.files.iter().filter(move |f| filter.matches(f))
    }
}

/// Archive query; `None` fields select everything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveFilter {
    pub market: Option<Market>,
    pub file_type: Option<ArchiveFileType>,
}

impl ArchiveFilter {
    #[must_use]
    pub fn matches(&self, file: &ArchiveFile) -> bool {
        self.market.map_or(true, |m| m == file.market)
            && self.file_type.map_or(true, |t| t == file.file_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use workbench_core::{ArchiveFileId, NewArchiveFile};

    fn file(id: &str, market: Market, file_type: ArchiveFileType) -> ArchiveFile {
        NewArchiveFile {
            filename: format!("{id}.xlsx"),
            cycle: None,
            market,
            size: "1.0 MB".into(),
            file_type,
            download_url: format!("/api/files/{id}.xlsx"),
        }
        .into_file(
            ArchiveFileId::from(id),
            Utc.with_ymd_and_hms(2026, 1, 19, 14, 35, 0).unwrap(),
        )
    }

    #[test]
    fn filter_combines_market_and_type() {
        let archive = Archive::from_files([
            file("file-1", Market::UK, ArchiveFileType::Upload),
            file("file-2", Market::CZ, ArchiveFileType::Exception),
            file("file-3", Market::UK, ArchiveFileType::Audit),
        ]);

        let uk = ArchiveFilter {
            market: Some(Market::UK),
            file_type: None,
        };
        assert_eq!(archive.filtered(&uk).count(), 2);

        let uk_audit = ArchiveFilter {
            market: Some(Market::UK),
            file_type: Some(ArchiveFileType::Audit),
        };
        let ids: Vec<_> = archive.filtered(&uk_audit).map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["file-3"]);
    }

    #[test]
    fn prepend_keeps_newest_first() {
        let mut archive = Archive::default();
        archive.prepend(file("a", Market::DE, ArchiveFileType::Upload));
        archive.prepend(file("b", Market::DE, ArchiveFileType::Upload));
        let ids: Vec<_> = archive.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
