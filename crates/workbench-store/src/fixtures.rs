//! Seed data the workbench starts every session with

use crate::activity::ActivityLog;
use crate::archive::Archive;
use crate::store::StoreState;
use chrono::{DateTime, NaiveDate, Utc};
use workbench_core::{
    ArchiveFileId, ArchiveFileType, CycleId, CycleStatus, ExceptionTask, LogEntryId, Market,
    MeterDataCycle, NewActivity, NewArchiveFile, TaskHeader, TaskId, TaskStatus, UploadTask,
    ValidationTask,
};

/// UTC timestamp for a fixture; fixture dates are always valid
fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(y, mo, d)
        .and_then(|date| date.and_hms_opt(h, mi, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

/// Full seeded state
#[must_use]
pub fn seed() -> StoreState {
    StoreState {
        uploads: upload_tasks(),
        exceptions: exception_tasks(),
        validations: validation_tasks(),
        activity: activity_log(),
        archive: archive_files(),
        cycles: meter_data_cycles(),
    }
}

#[must_use]
pub fn meter_data_cycles() -> Vec<MeterDataCycle> {
    [
        ("1", Market::UK, "January 2026", "28/01/26", CycleStatus::Current, 98),
        ("2", Market::CZ, "December 2025", "01/12/25", CycleStatus::Pending, 95),
        ("3", Market::DE, "November 2025", "15/11/25", CycleStatus::Stale, 87),
        ("4", Market::FR, "October 2025", "08/10/25", CycleStatus::Stale, 73),
        ("5", Market::PL, "October 2025", "12/10/25", CycleStatus::Stale, 71),
        ("6", Market::NL, "September 2025", "22/09/25", CycleStatus::Stale, 76),
        ("7", Market::ES, "October 2025", "03/10/25", CycleStatus::Stale, 70),
        ("8", Market::IT, "November 2025", "18/11/25", CycleStatus::Stale, 78),
    ]
    .into_iter()
    .map(|(id, market, period, date, status, quality_score)| MeterDataCycle {
        id: CycleId::from(id),
        market,
        period: period.to_string(),
        date: date.to_string(),
        status,
        quality_score,
    })
    .collect()
}

#[must_use]
pub fn upload_tasks() -> Vec<UploadTask> {
    let mut header = TaskHeader::new(
        "ul360-1",
        "Upload to UL360",
        Market::UK,
        TaskStatus::Pending,
        ts(2026, 1, 15, 9, 0),
    );
    header.description = "Upload meter data for consumption".to_string();
    header.meter_count = Some(608);

    vec![UploadTask::new(header).with_file_url("/api/download/uk-dec-2025-electricity.xlsx")]
}

#[must_use]
pub fn exception_tasks() -> Vec<ExceptionTask> {
    let mut header = TaskHeader::new(
        "exception-1",
        "Meter Registry Exceptions",
        Market::UK,
        TaskStatus::Attention,
        ts(2026, 1, 12, 10, 15),
    );
    header.description = "Identify and resolve missing meters in UK registry".to_string();
    header.updated_at = ts(2026, 1, 19, 11, 30);
    header.meter_count = Some(30);

    vec![ExceptionTask::new(header, 30)]
}

#[must_use]
pub fn validation_tasks() -> Vec<ValidationTask> {
    let mut header = TaskHeader::new(
        "validation-1",
        "Data Validation Errors",
        Market::UK,
        TaskStatus::Attention,
        ts(2026, 1, 17, 10, 0),
    );
    header.description =
        "Review and correct the data validation errors flagged below.".to_string();
    header.updated_at = ts(2026, 1, 20, 9, 15);
    header.meter_count = Some(8);

    vec![ValidationTask::new(
        header,
        "Data Validation Errors",
        "8 meters have data issues and have not been included in the UL360 upload file. \
         These meters can't be processed until the validation errors have been reviewed and corrected.",
    )]
}

#[must_use]
pub fn activity_log() -> ActivityLog {
    let rows = [
        (
            "log-1",
            ts(2026, 1, 20, 14, 35),
            NewActivity::agent("Generated UK Electricity Upload File", Market::UK)
                .for_task(TaskId::from("ul360-1"))
                .with_details("345 meters processed successfully"),
        ),
        (
            "log-2",
            ts(2026, 1, 20, 13, 22),
            NewActivity::human("Uploaded Error Report", Market::CZ)
                .by("David Dunbar")
                .for_task(TaskId::from("ul360-2"))
                .with_details("Uploaded correction file for 12 failed meters"),
        ),
        (
            "log-3",
            ts(2026, 1, 20, 11, 45),
            NewActivity::agent("Detected Missing Meters", Market::UK)
                .for_task(TaskId::from("exception-1"))
                .with_details("Identified 17 meters missing from registry"),
        ),
        (
            "log-4",
            ts(2026, 1, 20, 9, 15),
            NewActivity::human("Reviewed Data Validation Errors", Market::UK)
                .by("Stefan Butler")
                .for_task(TaskId::from("validation-1"))
                .with_details("Reviewed 12 meters with missing values"),
        ),
        (
            "log-5",
            ts(2026, 1, 19, 16, 30),
            NewActivity::agent("Triggered Data Reprocessing", Market::FR)
                .for_task(TaskId::from("exception-3"))
                .with_details("Reprocessing 23 meters after registry update"),
        ),
        (
            "log-6",
            ts(2026, 1, 19, 14, 20),
            NewActivity::human("Downloaded Upload File", Market::UK)
                .by("Gabriella Zepf")
                .for_task(TaskId::from("ul360-1"))
                .with_details("UK December 2025 electricity upload file"),
        ),
        (
            "log-7",
            ts(2026, 1, 18, 14, 22),
            NewActivity::agent("Detected Partial Upload Success", Market::CZ)
                .for_task(TaskId::from("ul360-2"))
                .with_details("Upload completed with 12 errors requiring attention"),
        ),
        (
            "log-8",
            ts(2026, 1, 17, 16, 45),
            NewActivity::agent("Generated Exception File", Market::FR)
                .for_task(TaskId::from("exception-3"))
                .with_details("Exception file created for 23 missing meters"),
        ),
    ];

    ActivityLog::from_entries(
        rows.into_iter()
            .map(|(id, at, activity)| activity.into_entry(LogEntryId::from(id), at)),
    )
}

#[must_use]
pub fn archive_files() -> Archive {
    let rows = [
        (
            "file-1",
            "UL360 Upload File - 2026-01-19.csv",
            "December 2025",
            Market::UK,
            ts(2026, 1, 19, 14, 35),
            "2.3 MB",
            ArchiveFileType::Upload,
            "/api/files/uk-dec-2025.xlsx",
        ),
        (
            "file-2",
            "CZ Gas Exception Report - November 25.xlsx",
            "November 2025",
            Market::CZ,
            ts(2026, 1, 18, 11, 20),
            "1.1 MB",
            ArchiveFileType::Exception,
            "/api/files/cz-nov-2025-exceptions.xlsx",
        ),
        (
            "file-3",
            "FR Missing Meters Exception - October 25.xlsx",
            "October 2025",
            Market::FR,
            ts(2026, 1, 17, 16, 45),
            "890 KB",
            ArchiveFileType::Exception,
            "/api/files/fr-oct-2025-exceptions.xlsx",
        ),
        (
            "file-4",
            "UK Data Quality Audit - December 25.pdf",
            "December 2025",
            Market::UK,
            ts(2026, 1, 20, 9, 0),
            "456 KB",
            ArchiveFileType::Audit,
            "/api/files/uk-dec-2025-audit.pdf",
        ),
        (
            "file-5",
            "UL360 Upload File - 2026-01-15.csv",
            "November 2025",
            Market::DE,
            ts(2026, 1, 15, 10, 30),
            "3.1 MB",
            ArchiveFileType::Upload,
            "/api/files/de-nov-2025.xlsx",
        ),
    ];

    Archive::from_files(rows.into_iter().map(
        |(id, filename, cycle, market, at, size, file_type, url)| {
            NewArchiveFile {
                filename: filename.to_string(),
                cycle: Some(cycle.to_string()),
                market,
                size: size.to_string(),
                file_type,
                download_url: url.to_string(),
            }
            .into_file(ArchiveFileId::from(id), at)
        },
    ))
}
