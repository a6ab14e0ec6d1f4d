use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::{RequireAgencyAdmin, RequireStaff};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::submissions::dtos::{
    AssignMemberDto, BulkAssignDto, BulkAssignResponseDto, GroupedQuery, GroupedViewDto,
    ListSubmissionsQuery, RemoveFileDto, SubmissionDetailDto, SubmissionResponseDto,
    UpdateStatusDto,
};
use crate::features::submissions::models::Submission;
use crate::features::submissions::services::{SubmissionListFilter, SubmissionService};
use crate::shared::types::{ApiResponse, Meta};
use crate::shared::uploads::UploadForm;

async fn load_accessible(
    service: &SubmissionService,
    user: &AuthenticatedUser,
    id: Uuid,
) -> Result<Submission> {
    let submission = service.get(id).await?;
    user.ensure_agency_access(submission.agency_id)?;
    Ok(submission)
}

/// List submissions
#[utoipa::path(
    get,
    path = "/api/submissions",
    params(ListSubmissionsQuery),
    responses(
        (status = 200, description = "Submissions", body = ApiResponse<Vec<SubmissionResponseDto>>),
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn list_submissions(
    State(service): State<Arc<SubmissionService>>,
    RequireStaff(user): RequireStaff,
    AppQuery(query): AppQuery<ListSubmissionsQuery>,
) -> Result<Json<ApiResponse<Vec<SubmissionResponseDto>>>> {
    let agency_id = user.require_agency(query.agency_id)?;
    let filter = SubmissionListFilter {
        status: query.status,
        school_id: query.school_id,
        report_id: query.report_id,
    };
    let (submissions, total) = service
        .list(agency_id, filter, &query.pagination())
        .await?;
    Ok(Json(ApiResponse::success(
        Some(submissions),
        None,
        Some(Meta { total }),
    )))
}

/// Grouped and filtered submission view
///
/// Buckets the agency's submissions by school or by report schedule, with a
/// progress summary per group and the ids a "select all" would pick.
#[utoipa::path(
    get,
    path = "/api/submissions/grouped",
    params(GroupedQuery),
    responses(
        (status = 200, description = "Grouped view", body = ApiResponse<GroupedViewDto>),
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn grouped_submissions(
    State(service): State<Arc<SubmissionService>>,
    RequireStaff(user): RequireStaff,
    AppQuery(query): AppQuery<GroupedQuery>,
) -> Result<Json<ApiResponse<GroupedViewDto>>> {
    let agency_id = user.require_agency(query.agency_id)?;
    let grouped = service
        .grouped(agency_id, &query.filters(), query.view)
        .await?;
    Ok(Json(ApiResponse::success(Some(grouped.into()), None, None)))
}

/// Get a submission with resolved names
#[utoipa::path(
    get,
    path = "/api/submissions/{id}",
    params(("id" = Uuid, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Submission", body = ApiResponse<SubmissionDetailDto>),
        (status = 404, description = "Submission not found")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn get_submission(
    State(service): State<Arc<SubmissionService>>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SubmissionDetailDto>>> {
    let submission = load_accessible(&service, &user, id).await?;
    let detail = service.detail(&submission).await?;
    Ok(Json(ApiResponse::success(Some(detail.into()), None, None)))
}

/// Assign or unassign a team member
#[utoipa::path(
    patch,
    path = "/api/submissions/{id}/assign",
    params(("id" = Uuid, Path, description = "Submission ID")),
    request_body = AssignMemberDto,
    responses(
        (status = 200, description = "Submission assigned", body = ApiResponse<SubmissionResponseDto>),
        (status = 400, description = "Member belongs to another agency")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn assign_submission(
    State(service): State<Arc<SubmissionService>>,
    RequireAgencyAdmin(user): RequireAgencyAdmin,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<AssignMemberDto>,
) -> Result<Json<ApiResponse<SubmissionResponseDto>>> {
    let submission = load_accessible(&service, &user, id).await?;
    let updated = service.assign(&submission, dto.member_id).await?;
    Ok(Json(ApiResponse::success(Some(updated.into()), None, None)))
}

/// Assign many submissions at once
#[utoipa::path(
    post,
    path = "/api/submissions/assign",
    request_body = BulkAssignDto,
    responses(
        (status = 200, description = "Submissions assigned", body = ApiResponse<BulkAssignResponseDto>),
        (status = 404, description = "Some submissions were not found")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn bulk_assign_submissions(
    State(service): State<Arc<SubmissionService>>,
    RequireAgencyAdmin(user): RequireAgencyAdmin,
    AppJson(dto): AppJson<BulkAssignDto>,
) -> Result<Json<ApiResponse<BulkAssignResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let agency_id = user.require_agency(dto.agency_id)?;
    let updated = service
        .bulk_assign(agency_id, &dto.submission_ids, dto.member_id)
        .await?;
    Ok(Json(ApiResponse::success(
        Some(BulkAssignResponseDto { updated }),
        None,
        None,
    )))
}

/// Move a submission through the review workflow
#[utoipa::path(
    patch,
    path = "/api/submissions/{id}/status",
    params(("id" = Uuid, Path, description = "Submission ID")),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<SubmissionResponseDto>),
        (status = 400, description = "Transition not allowed")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn update_submission_status(
    State(service): State<Arc<SubmissionService>>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateStatusDto>,
) -> Result<Json<ApiResponse<SubmissionResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let submission = load_accessible(&service, &user, id).await?;
    let updated = service.update_status(&submission, &dto).await?;
    Ok(Json(ApiResponse::success(Some(updated.into()), None, None)))
}

/// Attach a file to a submission
///
/// Accepts multipart/form-data with a single `file` part.
#[utoipa::path(
    post,
    path = "/api/submissions/{id}/files",
    params(("id" = Uuid, Path, description = "Submission ID")),
    request_body(content_type = "multipart/form-data", description = "`file` part"),
    responses(
        (status = 200, description = "File attached", body = ApiResponse<SubmissionResponseDto>),
        (status = 400, description = "Invalid file")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn upload_submission_file(
    State(service): State<Arc<SubmissionService>>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<SubmissionResponseDto>>> {
    let submission = load_accessible(&service, &user, id).await?;
    let file = UploadForm::read(multipart).await?.take_file()?;
    let updated = service.add_file(&submission, file).await?;
    Ok(Json(ApiResponse::success(Some(updated.into()), None, None)))
}

/// Detach a file from a submission
#[utoipa::path(
    delete,
    path = "/api/submissions/{id}/files",
    params(("id" = Uuid, Path, description = "Submission ID")),
    request_body = RemoveFileDto,
    responses(
        (status = 200, description = "File removed", body = ApiResponse<SubmissionResponseDto>),
        (status = 404, description = "File not attached")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn remove_submission_file(
    State(service): State<Arc<SubmissionService>>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<RemoveFileDto>,
) -> Result<Json<ApiResponse<SubmissionResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let submission = load_accessible(&service, &user, id).await?;
    let updated = service.remove_file(&submission, &dto.url).await?;
    Ok(Json(ApiResponse::success(Some(updated.into()), None, None)))
}
