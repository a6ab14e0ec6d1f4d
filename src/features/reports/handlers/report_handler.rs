use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::{RequireAgencyAdmin, RequireStaff};
use crate::features::reports::dtos::{
    AssignSchoolsDto, AssignSchoolsResponseDto, CreateReportDto, CreateScheduleDto,
    ListReportsQuery, ReportResponseDto, ScheduleResponseDto, UpdateReportDto,
};
use crate::features::reports::services::ReportService;
use crate::shared::types::{ApiResponse, Meta};

/// List report templates of an agency
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ListReportsQuery),
    responses(
        (status = 200, description = "Reports with categories and schedules", body = ApiResponse<Vec<ReportResponseDto>>),
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_reports(
    State(service): State<Arc<ReportService>>,
    RequireStaff(user): RequireStaff,
    AppQuery(query): AppQuery<ListReportsQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let agency_id = user.require_agency(query.agency_id)?;
    let reports: Vec<ReportResponseDto> = service
        .list(agency_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = reports.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(reports),
        None,
        Some(Meta { total }),
    )))
}

/// Get a report
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn get_report(
    State(service): State<Arc<ReportService>>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.get(id).await?;
    user.ensure_agency_access(report.report.agency_id)?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Create a report with categories and schedules
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 200, description = "Report created", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn create_report(
    State(service): State<Arc<ReportService>>,
    RequireAgencyAdmin(user): RequireAgencyAdmin,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let agency_id = user.require_agency(dto.agency_id)?;
    let report = service.create(agency_id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(report.into()),
        Some("Report created".to_string()),
        None,
    )))
}

/// Update a report
#[utoipa::path(
    put,
    path = "/api/reports/{id}",
    params(("id" = Uuid, Path, description = "Report ID")),
    request_body = UpdateReportDto,
    responses(
        (status = 200, description = "Report updated", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn update_report(
    State(service): State<Arc<ReportService>>,
    RequireAgencyAdmin(user): RequireAgencyAdmin,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateReportDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let existing = service.get(id).await?;
    user.ensure_agency_access(existing.report.agency_id)?;

    let report = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Delete a report without submissions
#[utoipa::path(
    delete,
    path = "/api/reports/{id}",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report deleted"),
        (status = 409, description = "Report has submissions")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn delete_report(
    State(service): State<Arc<ReportService>>,
    RequireAgencyAdmin(user): RequireAgencyAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    let existing = service.get(id).await?;
    user.ensure_agency_access(existing.report.agency_id)?;

    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Report deleted".to_string()),
        None,
    )))
}

/// Add a dated schedule to a report
#[utoipa::path(
    post,
    path = "/api/reports/{id}/schedules",
    params(("id" = Uuid, Path, description = "Report ID")),
    request_body = CreateScheduleDto,
    responses(
        (status = 200, description = "Schedule added", body = ApiResponse<ScheduleResponseDto>),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn add_schedule(
    State(service): State<Arc<ReportService>>,
    RequireAgencyAdmin(user): RequireAgencyAdmin,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CreateScheduleDto>,
) -> Result<Json<ApiResponse<ScheduleResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let existing = service.get(id).await?;
    user.ensure_agency_access(existing.report.agency_id)?;

    let schedule = service.add_schedule(&existing.report, &dto).await?;
    Ok(Json(ApiResponse::success(Some(schedule), None, None)))
}

/// Remove a schedule that has no submissions
#[utoipa::path(
    delete,
    path = "/api/reports/{id}/schedules/{schedule_id}",
    params(
        ("id" = Uuid, Path, description = "Report ID"),
        ("schedule_id" = Uuid, Path, description = "Schedule ID")
    ),
    responses(
        (status = 200, description = "Schedule removed"),
        (status = 409, description = "Schedule has submissions")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn remove_schedule(
    State(service): State<Arc<ReportService>>,
    RequireAgencyAdmin(user): RequireAgencyAdmin,
    Path((id, schedule_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<()>>> {
    let existing = service.get(id).await?;
    user.ensure_agency_access(existing.report.agency_id)?;

    service.remove_schedule(id, schedule_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Schedule removed".to_string()),
        None,
    )))
}

/// Assign a report to schools
///
/// Creates one `incompleted` submission for every schedule and school
/// pair that does not exist yet.
#[utoipa::path(
    post,
    path = "/api/reports/{id}/assign",
    params(("id" = Uuid, Path, description = "Report ID")),
    request_body = AssignSchoolsDto,
    responses(
        (status = 200, description = "Submissions created", body = ApiResponse<AssignSchoolsResponseDto>),
        (status = 400, description = "Unknown school")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn assign_schools(
    State(service): State<Arc<ReportService>>,
    RequireAgencyAdmin(user): RequireAgencyAdmin,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<AssignSchoolsDto>,
) -> Result<Json<ApiResponse<AssignSchoolsResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let existing = service.get(id).await?;
    user.ensure_agency_access(existing.report.agency_id)?;

    let created = service
        .assign_schools(&existing.report, &dto.school_ids)
        .await?;
    Ok(Json(ApiResponse::success(
        Some(AssignSchoolsResponseDto { created }),
        None,
        None,
    )))
}
