use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::submissions::grouping::{
    GroupedSubmissions, ResolvedSubmission, SubmissionFilters, SubmissionGroup, ViewMode,
};
use crate::features::submissions::models::SubmissionStatus;
use crate::features::submissions::progress::ProgressSummary;

/// Query string of the grouped view
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct GroupedQuery {
    pub agency_id: Option<Uuid>,
    /// `school` (default) or `report`
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub view: ViewMode,
    pub status: Option<String>,
    pub year: Option<String>,
    pub team_member: Option<String>,
    pub school: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl GroupedQuery {
    pub fn filters(&self) -> SubmissionFilters {
        SubmissionFilters {
            status: self.status.clone(),
            year: self.year.clone(),
            team_member: self.team_member.clone(),
            school: self.school.clone(),
            category: self.category.clone(),
            search: self.search.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionRowDto {
    pub id: Uuid,
    pub school_id: Uuid,
    pub school_name: String,
    pub report_schedule_id: Uuid,
    pub schedule_name: String,
    pub assigned_member_id: Option<Uuid>,
    pub assigned_member_name: Option<String>,
    pub status: SubmissionStatus,
    pub due_date: NaiveDate,
    pub school_submission_date: Option<NaiveDate>,
    pub file_count: usize,
}

impl From<ResolvedSubmission> for SubmissionRowDto {
    fn from(r: ResolvedSubmission) -> Self {
        Self {
            id: r.submission.id,
            school_id: r.submission.school_id,
            school_name: r.school_name,
            report_schedule_id: r.submission.report_schedule_id,
            schedule_name: r.schedule_name,
            assigned_member_id: r.submission.assigned_member_id,
            assigned_member_name: r.member_name,
            status: r.submission.status,
            due_date: r.submission.due_date,
            school_submission_date: r.submission.school_submission_date,
            file_count: r.submission.file_urls.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionGroupDto {
    pub id: Uuid,
    pub name: String,
    pub categories: Vec<CategoryResponseDto>,
    pub submissions: Vec<SubmissionRowDto>,
    pub progress: ProgressSummary,
}

impl From<SubmissionGroup> for SubmissionGroupDto {
    fn from(group: SubmissionGroup) -> Self {
        let progress = group.progress();
        Self {
            id: group.id,
            name: group.name,
            categories: group.categories.into_iter().map(Into::into).collect(),
            submissions: group.submissions.into_iter().map(Into::into).collect(),
            progress,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroupedViewDto {
    pub view: ViewMode,
    pub groups: Vec<SubmissionGroupDto>,
    /// Ids a "select all" would pick, in display order
    pub visible_ids: Vec<Uuid>,
    pub total: usize,
    pub unresolved: usize,
}

impl From<GroupedSubmissions> for GroupedViewDto {
    fn from(grouped: GroupedSubmissions) -> Self {
        let visible_ids = grouped.visible_ids();
        let total = grouped.total();
        Self {
            view: grouped.view,
            groups: grouped.groups.into_iter().map(Into::into).collect(),
            visible_ids,
            total,
            unresolved: grouped.unresolved,
        }
    }
}
