use std::sync::Arc;

use chrono::Utc;
use futures::future::try_join_all;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::config::ExportConfig;
use crate::core::error::{AppError, Result};
use crate::features::exports::bundle::{build_bundle, BundleEntry};
use crate::features::exports::dtos::ExportRequestDto;
use crate::features::submissions::grouping::{ReferenceData, ResolvedSubmission};
use crate::features::submissions::models::Submission;
use crate::features::submissions::selection::Selection;
use crate::features::submissions::SubmissionService;
use crate::modules::storage::FileStore;

/// A finished archive ready to be sent
#[derive(Debug)]
pub struct ExportBundle {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub submissions: usize,
}

pub struct ExportService {
    submissions: Arc<SubmissionService>,
    files: Arc<dyn FileStore>,
    config: ExportConfig,
}

impl ExportService {
    pub fn new(
        submissions: Arc<SubmissionService>,
        files: Arc<dyn FileStore>,
        config: ExportConfig,
    ) -> Self {
        Self {
            submissions,
            files,
            config,
        }
    }

    pub async fn export(&self, agency_id: Uuid, request: &ExportRequestDto) -> Result<ExportBundle> {
        let visible = if request.select_all {
            let grouped = self
                .submissions
                .grouped(agency_id, &request.filters, request.view)
                .await?;
            Some(grouped.visible_ids())
        } else {
            None
        };

        let selection = select(request, visible.as_deref(), self.config.max_submissions)?;

        let (submissions, references) = tokio::try_join!(
            self.submissions.load_many(agency_id, selection.ids()),
            self.submissions.reference_data(agency_id),
        )?;

        if submissions.len() != selection.len() {
            return Err(AppError::NotFound(format!(
                "{} of the selected submissions were not found",
                selection.len() - submissions.len()
            )));
        }

        let resolved = resolve_selected(&submissions, &references)?;
        let entries = fetch_files(self.files.as_ref(), resolved).await?;
        let count = entries.len();
        let summary_filename = self.config.summary_filename.clone();

        let bytes = tokio::task::spawn_blocking(move || build_bundle(&entries, &summary_filename))
            .await
            .map_err(|e| AppError::Internal(format!("Export task failed: {}", e)))??;

        info!(
            "Built export of {} submissions ({} bytes) for agency {}",
            count,
            bytes.len(),
            agency_id
        );

        Ok(ExportBundle {
            filename: format!("submissions-{}.zip", Utc::now().format("%Y%m%d")),
            bytes,
            submissions: count,
        })
    }
}

/// Resolve the requested ids against the visible ids of the grouped view
/// when "select all" is on
fn select(request: &ExportRequestDto, visible: Option<&[Uuid]>, max: usize) -> Result<Selection> {
    let selection = match visible {
        Some(visible) => {
            let mut selection = Selection::default();
            selection.toggle_all(visible);
            selection
        }
        None => request.submission_ids.iter().copied().collect(),
    };

    if selection.is_empty() {
        return Err(AppError::BadRequest("No submissions selected".to_string()));
    }
    if selection.len() > max {
        return Err(AppError::BadRequest(format!(
            "Cannot export {} submissions at once; the limit is {}",
            selection.len(),
            max
        )));
    }

    Ok(selection)
}

/// Resolve every selected submission; a single unresolvable one fails the export
fn resolve_selected(
    submissions: &[Submission],
    references: &ReferenceData,
) -> Result<Vec<ResolvedSubmission>> {
    let resolved: Vec<ResolvedSubmission> = submissions
        .iter()
        .filter_map(|s| references.resolve(s))
        .collect();

    let unresolved = submissions.len() - resolved.len();
    if unresolved > 0 {
        warn!(
            "Export rejected: {} selected submissions have a missing school, report or schedule",
            unresolved
        );
        return Err(AppError::NotFound(format!(
            "{} of the selected submissions reference a missing school, report or schedule",
            unresolved
        )));
    }

    Ok(resolved)
}

/// Download every file of every submission concurrently
async fn fetch_files(
    files: &dyn FileStore,
    submissions: Vec<ResolvedSubmission>,
) -> Result<Vec<BundleEntry>> {
    let downloads = submissions.iter().map(|resolved| {
        try_join_all(resolved.submission.file_urls.iter().map(|url| async move {
            let data = files.fetch(url).await?;
            Ok::<_, AppError>((url.clone(), data))
        }))
    });
    let fetched = try_join_all(downloads).await?;

    Ok(submissions
        .into_iter()
        .zip(fetched)
        .map(|(submission, files)| BundleEntry { submission, files })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::submissions::models::SubmissionStatus;
    use crate::modules::storage::MemoryFileStore;
    use chrono::NaiveDate;

    fn request(ids: &[Uuid], select_all: bool) -> ExportRequestDto {
        ExportRequestDto {
            submission_ids: ids.to_vec(),
            select_all,
            ..Default::default()
        }
    }

    fn resolved(urls: &[&str]) -> ResolvedSubmission {
        ResolvedSubmission {
            submission: Submission {
                id: Uuid::new_v4(),
                agency_id: Uuid::new_v4(),
                report_id: Uuid::new_v4(),
                report_schedule_id: Uuid::new_v4(),
                school_id: Uuid::new_v4(),
                assigned_member_id: None,
                status: SubmissionStatus::Completed,
                due_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
                school_submission_date: None,
                file_urls: urls.iter().map(|u| u.to_string()).collect(),
                note: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            school_name: "Lincoln Elementary".to_string(),
            report_name: "Safety Plan".to_string(),
            schedule_name: "Safety Plan (2025-01-15)".to_string(),
            member_name: None,
            categories: Vec::new(),
        }
    }

    #[test]
    fn test_select_all_takes_visible_ids() {
        let visible = vec![Uuid::new_v4(), Uuid::new_v4()];
        let explicit = [Uuid::new_v4()];
        let selection = select(&request(&explicit, true), Some(visible.as_slice()), 10).unwrap();
        assert_eq!(selection.ids(), visible.as_slice());
    }

    #[test]
    fn test_explicit_ids_are_deduplicated() {
        let id = Uuid::new_v4();
        let selection = select(&request(&[id, id], false), None, 10).unwrap();
        assert_eq!(selection.ids(), &[id]);
    }

    #[test]
    fn test_empty_and_oversized_selections_are_rejected() {
        assert!(matches!(
            select(&request(&[], false), None, 10),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            select(&request(&[], true), Some(&[][..]), 10),
            Err(AppError::BadRequest(_))
        ));

        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        assert!(matches!(
            select(&request(&ids, false), None, 2),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_unresolvable_selection_fails_instead_of_shrinking() {
        let references = ReferenceData::new(Vec::new(), Vec::new(), Vec::new());
        let submissions = vec![resolved(&[]).submission, resolved(&[]).submission];

        match resolve_selected(&submissions, &references) {
            Err(AppError::NotFound(message)) => assert!(message.starts_with("2 of")),
            other => panic!("expected NotFound, got {:?}", other.map(|r| r.len())),
        }
        assert!(resolve_selected(&[], &references).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_files_keeps_submission_order() {
        let store = MemoryFileStore::default()
            .with("mem://a.pdf", b"a")
            .with("mem://b.pdf", b"b")
            .with("mem://c.pdf", b"c");
        let submissions = vec![
            resolved(&["mem://a.pdf", "mem://b.pdf"]),
            resolved(&[]),
            resolved(&["mem://c.pdf"]),
        ];

        let entries = fetch_files(&store, submissions).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[0].files,
            vec![
                ("mem://a.pdf".to_string(), b"a".to_vec()),
                ("mem://b.pdf".to_string(), b"b".to_vec()),
            ]
        );
        assert!(entries[1].files.is_empty());
        assert_eq!(entries[2].files[0].1, b"c".to_vec());
    }

    #[tokio::test]
    async fn test_missing_file_fails_the_export() {
        let store = MemoryFileStore::default();
        let result = fetch_files(&store, vec![resolved(&["mem://gone.pdf"])]).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
