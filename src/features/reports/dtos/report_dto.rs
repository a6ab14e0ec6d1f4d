use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::reports::models::{ReportSchedule, ReportWithDetails};

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListReportsQuery {
    pub agency_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateScheduleDto {
    pub schedule_time: NaiveDate,
    #[validate(length(max = 255, message = "Report name must not exceed 255 characters"))]
    pub report_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReportDto {
    pub agency_id: Option<Uuid>,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub category_ids: Vec<Uuid>,

    #[serde(default)]
    #[validate(nested)]
    pub schedules: Vec<CreateScheduleDto>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateReportDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,
    /// Replaces the category links when present
    pub category_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AssignSchoolsDto {
    #[validate(length(min = 1, message = "At least one school is required"))]
    pub school_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignSchoolsResponseDto {
    /// Submissions newly created; existing pairs are not counted
    pub created: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScheduleResponseDto {
    pub id: Uuid,
    pub schedule_time: NaiveDate,
    pub report_name: Option<String>,
    pub display_name: String,
}

impl ScheduleResponseDto {
    pub fn new(schedule: ReportSchedule, report_name: &str) -> Self {
        Self {
            display_name: schedule.display_name(report_name),
            id: schedule.id,
            schedule_time: schedule.schedule_time,
            report_name: schedule.report_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub agency_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub categories: Vec<CategoryResponseDto>,
    pub schedules: Vec<ScheduleResponseDto>,
}

impl From<ReportWithDetails> for ReportResponseDto {
    fn from(details: ReportWithDetails) -> Self {
        let ReportWithDetails {
            report,
            categories,
            schedules,
        } = details;
        Self {
            schedules: schedules
                .into_iter()
                .map(|s| ScheduleResponseDto::new(s, &report.name))
                .collect(),
            categories: categories.into_iter().map(Into::into).collect(),
            id: report.id,
            agency_id: report.agency_id,
            name: report.name,
            description: report.description,
        }
    }
}
