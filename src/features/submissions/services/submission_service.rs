use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::ReportService;
use crate::features::schools::SchoolService;
use crate::features::submissions::dtos::{SubmissionResponseDto, UpdateStatusDto};
use crate::features::submissions::grouping::{
    group_submissions, GroupedSubmissions, ReferenceData, ResolvedSubmission,
    SubmissionFilters, ViewMode,
};
use crate::features::submissions::models::{Submission, SubmissionStatus};
use crate::features::users::SchoolUserService;
use crate::modules::storage::{FileVisibility, MinIOClient};
use crate::shared::types::PaginationQuery;
use crate::shared::uploads::UploadedFile;

const SUBMISSION_COLUMNS: &str = r#"
    id, agency_id, report_id, report_schedule_id, school_id, assigned_member_id,
    status, due_date, school_submission_date, file_urls, note, created_at, updated_at
"#;

/// Filters of the flat submission list
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmissionListFilter {
    pub status: Option<SubmissionStatus>,
    pub school_id: Option<Uuid>,
    pub report_id: Option<Uuid>,
}

pub struct SubmissionService {
    pool: PgPool,
    schools: Arc<SchoolService>,
    users: Arc<SchoolUserService>,
    reports: Arc<ReportService>,
    storage: Arc<MinIOClient>,
}

impl SubmissionService {
    pub fn new(
        pool: PgPool,
        schools: Arc<SchoolService>,
        users: Arc<SchoolUserService>,
        reports: Arc<ReportService>,
        storage: Arc<MinIOClient>,
    ) -> Self {
        Self {
            pool,
            schools,
            users,
            reports,
            storage,
        }
    }

    pub async fn list(
        &self,
        agency_id: Uuid,
        filter: SubmissionListFilter,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<SubmissionResponseDto>, i64)> {
        const WHERE: &str = r#"
            WHERE agency_id = $1
              AND ($2::submission_status IS NULL OR status = $2)
              AND ($3::uuid IS NULL OR school_id = $3)
              AND ($4::uuid IS NULL OR report_id = $4)
        "#;

        let submissions = sqlx::query_as::<_, Submission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions {WHERE} ORDER BY due_date, created_at LIMIT $5 OFFSET $6"
        ))
        .bind(agency_id)
        .bind(filter.status)
        .bind(filter.school_id)
        .bind(filter.report_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list submissions: {:?}", e);
            AppError::Database(e)
        })?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM submissions {WHERE}"))
            .bind(agency_id)
            .bind(filter.status)
            .bind(filter.school_id)
            .bind(filter.report_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count submissions: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((submissions.into_iter().map(Into::into).collect(), total))
    }

    pub async fn get(&self, id: Uuid) -> Result<Submission> {
        sqlx::query_as::<_, Submission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get submission: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Submission {} not found", id)))
    }

    /// Submission with school, schedule and member names
    pub async fn detail(&self, submission: &Submission) -> Result<ResolvedSubmission> {
        self.reference_data(submission.agency_id)
            .await?
            .resolve(submission)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Submission {} references a missing school or report",
                    submission.id
                ))
            })
    }

    /// Every submission of an agency in creation order
    pub async fn load_all(&self, agency_id: Uuid) -> Result<Vec<Submission>> {
        sqlx::query_as::<_, Submission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE agency_id = $1 ORDER BY created_at, id"
        ))
        .bind(agency_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load submissions: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Submissions of an agency by id, in the order asked for
    pub async fn load_many(&self, agency_id: Uuid, ids: &[Uuid]) -> Result<Vec<Submission>> {
        let mut found = sqlx::query_as::<_, Submission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE agency_id = $1 AND id = ANY($2)"
        ))
        .bind(agency_id)
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load submissions: {:?}", e);
            AppError::Database(e)
        })?;

        found.sort_by_key(|s| ids.iter().position(|id| *id == s.id));
        Ok(found)
    }

    pub async fn reference_data(&self, agency_id: Uuid) -> Result<ReferenceData> {
        let (schools, members, reports) = tokio::try_join!(
            self.schools.list_all(agency_id),
            self.users.list_all(agency_id),
            self.reports.list(agency_id),
        )?;
        Ok(ReferenceData::new(schools, members, reports))
    }

    /// The dashboard's grouped view over every submission of the agency
    pub async fn grouped(
        &self,
        agency_id: Uuid,
        filters: &SubmissionFilters,
        view: ViewMode,
    ) -> Result<GroupedSubmissions> {
        let (submissions, references) =
            tokio::try_join!(self.load_all(agency_id), self.reference_data(agency_id))?;

        let grouped = group_submissions(&submissions, &references, filters, view);
        if grouped.unresolved > 0 {
            warn!(
                "Grouped view for agency {} dropped {} submissions with missing references",
                agency_id, grouped.unresolved
            );
        }
        Ok(grouped)
    }

    /// Assign a team member of the same agency, or clear the assignment
    pub async fn assign(&self, submission: &Submission, member_id: Option<Uuid>) -> Result<Submission> {
        if let Some(member_id) = member_id {
            self.ensure_member_in_agency(member_id, submission.agency_id)
                .await?;
        }

        let updated = sqlx::query_as::<_, Submission>(&format!(
            "UPDATE submissions SET assigned_member_id = $2, updated_at = NOW() WHERE id = $1 RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(submission.id)
        .bind(member_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to assign submission: {:?}", e);
            AppError::Database(e)
        })?;

        info!(
            "Submission {} assigned to {:?}",
            updated.id, updated.assigned_member_id
        );
        Ok(updated)
    }

    /// All-or-nothing: fails when any id is not a submission of the agency
    pub async fn bulk_assign(
        &self,
        agency_id: Uuid,
        submission_ids: &[Uuid],
        member_id: Option<Uuid>,
    ) -> Result<u64> {
        if let Some(member_id) = member_id {
            self.ensure_member_in_agency(member_id, agency_id).await?;
        }

        let mut ids = submission_ids.to_vec();
        ids.sort();
        ids.dedup();

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to start transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let result = sqlx::query(
            "UPDATE submissions SET assigned_member_id = $1, updated_at = NOW() WHERE agency_id = $2 AND id = ANY($3)",
        )
        .bind(member_id)
        .bind(agency_id)
        .bind(&ids)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to bulk assign submissions: {:?}", e);
            AppError::Database(e)
        })?;

        if result.rows_affected() != ids.len() as u64 {
            return Err(AppError::NotFound(format!(
                "{} of {} submissions were not found",
                ids.len() as u64 - result.rows_affected(),
                ids.len()
            )));
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit bulk assignment: {:?}", e);
            AppError::Database(e)
        })?;

        info!(
            "Bulk assigned {} submissions to {:?}",
            result.rows_affected(),
            member_id
        );
        Ok(result.rows_affected())
    }

    /// Move along the review workflow. Submitting stamps today's date.
    pub async fn update_status(
        &self,
        submission: &Submission,
        dto: &UpdateStatusDto,
    ) -> Result<Submission> {
        if !submission.status.can_transition_to(dto.status) {
            return Err(AppError::BadRequest(format!(
                "Cannot move a submission from '{}' to '{}'",
                submission.status, dto.status
            )));
        }

        let submitted_on =
            (dto.status == SubmissionStatus::Pending).then(|| Utc::now().date_naive());

        let updated = sqlx::query_as::<_, Submission>(&format!(
            r#"
            UPDATE submissions
            SET status = $2,
                note = COALESCE($3, note),
                school_submission_date = COALESCE($4, school_submission_date),
                updated_at = NOW()
            WHERE id = $1 AND status = $5
            RETURNING {SUBMISSION_COLUMNS}
            "#
        ))
        .bind(submission.id)
        .bind(dto.status)
        .bind(dto.note.as_deref())
        .bind(submitted_on)
        .bind(submission.status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update submission status: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| {
            AppError::Conflict("Submission status changed concurrently, reload and retry".to_string())
        })?;

        info!(
            "Submission {} status {} -> {}",
            updated.id, submission.status, updated.status
        );
        Ok(updated)
    }

    /// Store a file privately and record its URL on the submission
    pub async fn add_file(&self, submission: &Submission, file: UploadedFile) -> Result<Submission> {
        let path = format!(
            "submissions/{}/{}-{}",
            submission.id,
            Uuid::now_v7(),
            file.file_name
        );
        let key = self.storage.generate_key(FileVisibility::Private, &path);
        self.storage
            .upload(&key, &file.data, &file.content_type)
            .await?;
        let url = self.storage.file_url(&key);

        let updated = sqlx::query_as::<_, Submission>(&format!(
            "UPDATE submissions SET file_urls = array_append(file_urls, $2), updated_at = NOW() WHERE id = $1 RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(submission.id)
        .bind(&url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to attach file to submission: {:?}", e);
            AppError::Database(e)
        })?;

        info!(
            "File attached: submission={}, key={}, size={}",
            submission.id,
            key,
            file.data.len()
        );
        Ok(updated)
    }

    pub async fn remove_file(&self, submission: &Submission, url: &str) -> Result<Submission> {
        if !submission.file_urls.iter().any(|u| u == url) {
            return Err(AppError::NotFound(
                "File is not attached to this submission".to_string(),
            ));
        }

        let updated = sqlx::query_as::<_, Submission>(&format!(
            "UPDATE submissions SET file_urls = array_remove(file_urls, $2), updated_at = NOW() WHERE id = $1 RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(submission.id)
        .bind(url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to detach file from submission: {:?}", e);
            AppError::Database(e)
        })?;

        // The row no longer points at the object; a failed delete only leaks it
        match self.storage.extract_key_from_url(url) {
            Some(key) => {
                if let Err(e) = self.storage.delete(&key).await {
                    warn!("Failed to delete detached file '{}': {}", key, e);
                }
            }
            None => warn!("Detached file '{}' is not in this bucket", url),
        }

        info!("File detached: submission={}", submission.id);
        Ok(updated)
    }

    async fn ensure_member_in_agency(&self, member_id: Uuid, agency_id: Uuid) -> Result<()> {
        let member = self.users.get(member_id).await?;
        if member.agency_id != agency_id {
            return Err(AppError::BadRequest(
                "Team member belongs to another agency".to_string(),
            ));
        }
        Ok(())
    }
}
