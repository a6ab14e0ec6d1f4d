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
use crate::features::schools::dtos::{
    CreateSchoolDto, ListSchoolsQuery, SchoolResponseDto, UpdateSchoolDto,
};
use crate::features::schools::services::SchoolService;
use crate::shared::types::{ApiResponse, Meta};

/// List schools of an agency
#[utoipa::path(
    get,
    path = "/api/schools",
    params(ListSchoolsQuery),
    responses(
        (status = 200, description = "Schools", body = ApiResponse<Vec<SchoolResponseDto>>),
    ),
    security(("bearer_auth" = [])),
    tag = "schools"
)]
pub async fn list_schools(
    State(service): State<Arc<SchoolService>>,
    RequireStaff(user): RequireStaff,
    AppQuery(query): AppQuery<ListSchoolsQuery>,
) -> Result<Json<ApiResponse<Vec<SchoolResponseDto>>>> {
    let agency_id = user.require_agency(query.agency_id)?;
    let (schools, total) = service
        .list(agency_id, query.search.as_deref(), &query.pagination())
        .await?;
    Ok(Json(ApiResponse::success(
        Some(schools),
        None,
        Some(Meta { total }),
    )))
}

/// Get a school
#[utoipa::path(
    get,
    path = "/api/schools/{id}",
    params(("id" = Uuid, Path, description = "School ID")),
    responses(
        (status = 200, description = "School", body = ApiResponse<SchoolResponseDto>),
        (status = 404, description = "School not found")
    ),
    security(("bearer_auth" = [])),
    tag = "schools"
)]
pub async fn get_school(
    State(service): State<Arc<SchoolService>>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SchoolResponseDto>>> {
    let school = service.get(id).await?;
    user.ensure_agency_access(school.agency_id)?;
    Ok(Json(ApiResponse::success(Some(school.into()), None, None)))
}

/// Create a school
#[utoipa::path(
    post,
    path = "/api/schools",
    request_body = CreateSchoolDto,
    responses(
        (status = 200, description = "School created", body = ApiResponse<SchoolResponseDto>),
        (status = 400, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "schools"
)]
pub async fn create_school(
    State(service): State<Arc<SchoolService>>,
    RequireAgencyAdmin(user): RequireAgencyAdmin,
    AppJson(dto): AppJson<CreateSchoolDto>,
) -> Result<Json<ApiResponse<SchoolResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let agency_id = user.require_agency(dto.agency_id)?;
    let school = service.create(agency_id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(school),
        Some("School created".to_string()),
        None,
    )))
}

/// Update a school
#[utoipa::path(
    put,
    path = "/api/schools/{id}",
    params(("id" = Uuid, Path, description = "School ID")),
    request_body = UpdateSchoolDto,
    responses(
        (status = 200, description = "School updated", body = ApiResponse<SchoolResponseDto>),
        (status = 404, description = "School not found")
    ),
    security(("bearer_auth" = [])),
    tag = "schools"
)]
pub async fn update_school(
    State(service): State<Arc<SchoolService>>,
    RequireAgencyAdmin(user): RequireAgencyAdmin,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateSchoolDto>,
) -> Result<Json<ApiResponse<SchoolResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let existing = service.get(id).await?;
    user.ensure_agency_access(existing.agency_id)?;

    let school = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(school), None, None)))
}

/// Deactivate a school
#[utoipa::path(
    delete,
    path = "/api/schools/{id}",
    params(("id" = Uuid, Path, description = "School ID")),
    responses(
        (status = 200, description = "School deleted"),
        (status = 404, description = "School not found")
    ),
    security(("bearer_auth" = [])),
    tag = "schools"
)]
pub async fn delete_school(
    State(service): State<Arc<SchoolService>>,
    RequireAgencyAdmin(user): RequireAgencyAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    let existing = service.get(id).await?;
    user.ensure_agency_access(existing.agency_id)?;

    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("School deleted".to_string()),
        None,
    )))
}
