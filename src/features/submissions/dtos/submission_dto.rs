use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::submissions::grouping::ResolvedSubmission;
use crate::features::submissions::models::{Submission, SubmissionStatus};
use crate::shared::types::{default_page, default_page_size, PaginationQuery};

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListSubmissionsQuery {
    pub agency_id: Option<Uuid>,
    pub status: Option<SubmissionStatus>,
    pub school_id: Option<Uuid>,
    pub report_id: Option<Uuid>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl ListSubmissionsQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Flat list item
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResponseDto {
    pub id: Uuid,
    pub report_id: Uuid,
    pub report_schedule_id: Uuid,
    pub school_id: Uuid,
    pub assigned_member_id: Option<Uuid>,
    pub status: SubmissionStatus,
    pub due_date: NaiveDate,
    pub school_submission_date: Option<NaiveDate>,
    pub file_urls: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<Submission> for SubmissionResponseDto {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            report_id: s.report_id,
            report_schedule_id: s.report_schedule_id,
            school_id: s.school_id,
            assigned_member_id: s.assigned_member_id,
            status: s.status,
            due_date: s.due_date,
            school_submission_date: s.school_submission_date,
            file_urls: s.file_urls,
            updated_at: s.updated_at,
        }
    }
}

/// Detail view with resolved names
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionDetailDto {
    #[serde(flatten)]
    pub submission: SubmissionResponseDto,
    pub school_name: String,
    pub report_name: String,
    pub schedule_name: String,
    pub assigned_member_name: Option<String>,
    pub note: Option<String>,
}

impl From<ResolvedSubmission> for SubmissionDetailDto {
    fn from(r: ResolvedSubmission) -> Self {
        Self {
            note: r.submission.note.clone(),
            submission: r.submission.into(),
            school_name: r.school_name,
            report_name: r.report_name,
            schedule_name: r.schedule_name,
            assigned_member_name: r.member_name,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AssignMemberDto {
    /// `null` clears the assignment
    pub member_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BulkAssignDto {
    /// Required for super admins
    pub agency_id: Option<Uuid>,
    #[validate(length(min = 1, message = "At least one submission is required"))]
    pub submission_ids: Vec<Uuid>,
    pub member_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkAssignResponseDto {
    pub updated: u64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusDto {
    pub status: SubmissionStatus,
    #[validate(length(max = 2000, message = "Note must not exceed 2000 characters"))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RemoveFileDto {
    #[validate(length(min = 1, message = "url is required"))]
    pub url: String,
}
