//! Zip bundle of selected submissions.
//!
//! Layout of the archive:
//!
//! ```text
//! summary.xlsx
//! Lincoln Elementary/Safety Plan (2024-09-01)/plan.pdf
//! Lincoln Elementary/Safety Plan (2024-09-01)/plan (2).pdf
//! ```

use std::collections::HashSet;
use std::io::{Cursor, Write};

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::core::error::AppError;
use crate::features::submissions::grouping::ResolvedSubmission;
use crate::shared::uploads::{file_name_from_url, sanitize_segment};

const SUMMARY_SHEET: &str = "Summary";

const SUMMARY_HEADERS: [&str; 7] = [
    "School",
    "Report",
    "Due Date",
    "Status",
    "Assigned To",
    "Submitted On",
    "Files",
];

/// A submission together with the bytes of its files, keyed by stored URL
#[derive(Debug, Clone)]
pub struct BundleEntry {
    pub submission: ResolvedSubmission,
    pub files: Vec<(String, Vec<u8>)>,
}

/// Workbook with a single "Summary" sheet, one row per submission in the given order
pub fn summary_xlsx(submissions: &[ResolvedSubmission]) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SUMMARY_SHEET).map_err(xlsx_error)?;

    for (col, title) in SUMMARY_HEADERS.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *title, &header)
            .map_err(xlsx_error)?;
    }

    for (index, resolved) in submissions.iter().enumerate() {
        let row = index as u32 + 1;
        let submission = &resolved.submission;
        let submitted_on = submission
            .school_submission_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let files = submission
            .file_urls
            .iter()
            .map(|url| file_name_from_url(url))
            .collect::<Vec<_>>()
            .join("; ");

        let cells = [
            resolved.school_name.clone(),
            resolved.schedule_name.clone(),
            submission.due_date.format("%Y-%m-%d").to_string(),
            submission.status.as_str().to_string(),
            resolved.member_name.clone().unwrap_or_default(),
            submitted_on,
            files,
        ];
        for (col, value) in cells.iter().enumerate() {
            sheet
                .write_string(row, col as u16, value.as_str())
                .map_err(xlsx_error)?;
        }
    }

    workbook.save_to_buffer().map_err(xlsx_error)
}

fn xlsx_error(e: XlsxError) -> AppError {
    AppError::Internal(format!("Failed to write summary: {}", e))
}

/// Build the archive in memory
pub fn build_bundle(entries: &[BundleEntry], summary_filename: &str) -> Result<Vec<u8>, AppError> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let mut paths = EntryPaths::default();

    let summary: Vec<ResolvedSubmission> =
        entries.iter().map(|e| e.submission.clone()).collect();
    let summary_path = paths.claim(&sanitize_segment(summary_filename));
    zip.start_file(summary_path, options).map_err(zip_error)?;
    zip.write_all(&summary_xlsx(&summary)?)
        .map_err(|e| AppError::Internal(format!("Failed to write summary: {}", e)))?;

    for entry in entries {
        let folder = format!(
            "{}/{}",
            sanitize_segment(&entry.submission.school_name),
            sanitize_segment(&entry.submission.schedule_name)
        );

        for (url, data) in &entry.files {
            let path = paths.claim(&format!("{}/{}", folder, file_name_from_url(url)));
            zip.start_file(path.as_str(), options).map_err(zip_error)?;
            zip.write_all(data)
                .map_err(|e| AppError::Internal(format!("Failed to write '{}': {}", path, e)))?;
        }
    }

    let cursor = zip.finish().map_err(zip_error)?;
    Ok(cursor.into_inner())
}

fn zip_error(e: zip::result::ZipError) -> AppError {
    AppError::Internal(format!("Failed to build archive: {}", e))
}

/// Hands out unique entry paths, numbering repeats as `name (2).ext`
#[derive(Default)]
struct EntryPaths {
    used: HashSet<String>,
}

impl EntryPaths {
    fn claim(&mut self, path: &str) -> String {
        let mut candidate = path.to_string();
        let mut n = 2;
        while self.used.contains(&candidate) {
            candidate = numbered(path, n);
            n += 1;
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

fn numbered(path: &str, n: usize) -> String {
    let (dir, name) = match path.rsplit_once('/') {
        Some((dir, name)) => (format!("{}/", dir), name),
        None => (String::new(), path),
    };
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}{} ({}).{}", dir, stem, n, ext),
        _ => format!("{}{} ({})", dir, name, n),
    }
}
