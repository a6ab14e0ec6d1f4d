use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::agencies::dtos::{AgencyResponseDto, CreateAgencyDto, UpdateAgencyDto};
use crate::features::agencies::services::AgencyService;
use crate::features::auth::guards::{RequireStaff, RequireSuperAdmin};
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List agencies
#[utoipa::path(
    get,
    path = "/api/agencies",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Agencies", body = ApiResponse<Vec<AgencyResponseDto>>),
        (status = 403, description = "Super admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "agencies"
)]
pub async fn list_agencies(
    State(service): State<Arc<AgencyService>>,
    RequireSuperAdmin(_user): RequireSuperAdmin,
    AppQuery(pagination): AppQuery<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<AgencyResponseDto>>>> {
    let (agencies, total) = service.list(&pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(agencies),
        None,
        Some(Meta { total }),
    )))
}

/// Get an agency
#[utoipa::path(
    get,
    path = "/api/agencies/{id}",
    params(("id" = Uuid, Path, description = "Agency ID")),
    responses(
        (status = 200, description = "Agency", body = ApiResponse<AgencyResponseDto>),
        (status = 404, description = "Agency not found")
    ),
    security(("bearer_auth" = [])),
    tag = "agencies"
)]
pub async fn get_agency(
    State(service): State<Arc<AgencyService>>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AgencyResponseDto>>> {
    user.ensure_agency_access(id)?;
    let agency = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(agency), None, None)))
}

/// Create an agency
#[utoipa::path(
    post,
    path = "/api/agencies",
    request_body = CreateAgencyDto,
    responses(
        (status = 200, description = "Agency created", body = ApiResponse<AgencyResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Slug already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "agencies"
)]
pub async fn create_agency(
    State(service): State<Arc<AgencyService>>,
    RequireSuperAdmin(_user): RequireSuperAdmin,
    AppJson(dto): AppJson<CreateAgencyDto>,
) -> Result<Json<ApiResponse<AgencyResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let agency = service.create(dto).await?;
    Ok(Json(ApiResponse::success(
        Some(agency),
        Some("Agency created".to_string()),
        None,
    )))
}

/// Update an agency
#[utoipa::path(
    put,
    path = "/api/agencies/{id}",
    params(("id" = Uuid, Path, description = "Agency ID")),
    request_body = UpdateAgencyDto,
    responses(
        (status = 200, description = "Agency updated", body = ApiResponse<AgencyResponseDto>),
        (status = 404, description = "Agency not found")
    ),
    security(("bearer_auth" = [])),
    tag = "agencies"
)]
pub async fn update_agency(
    State(service): State<Arc<AgencyService>>,
    RequireSuperAdmin(_user): RequireSuperAdmin,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateAgencyDto>,
) -> Result<Json<ApiResponse<AgencyResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let agency = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(agency), None, None)))
}
