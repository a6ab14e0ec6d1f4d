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
use crate::features::users::dtos::{
    CreateSchoolUserDto, ListSchoolUsersQuery, SchoolUserResponseDto, UpdateSchoolUserDto,
};
use crate::features::users::services::SchoolUserService;
use crate::shared::types::{ApiResponse, Meta};

/// List users of an agency
#[utoipa::path(
    get,
    path = "/api/users",
    params(ListSchoolUsersQuery),
    responses(
        (status = 200, description = "Users", body = ApiResponse<Vec<SchoolUserResponseDto>>),
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn list_users(
    State(service): State<Arc<SchoolUserService>>,
    RequireStaff(user): RequireStaff,
    AppQuery(query): AppQuery<ListSchoolUsersQuery>,
) -> Result<Json<ApiResponse<Vec<SchoolUserResponseDto>>>> {
    let agency_id = user.require_agency(query.agency_id)?;
    let (users, total) = service
        .list(agency_id, query.role, &query.pagination())
        .await?;
    Ok(Json(ApiResponse::success(
        Some(users),
        None,
        Some(Meta { total }),
    )))
}

/// Get a user
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = ApiResponse<SchoolUserResponseDto>),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn get_user(
    State(service): State<Arc<SchoolUserService>>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SchoolUserResponseDto>>> {
    let found = service.get(id).await?;
    user.ensure_agency_access(found.agency_id)?;
    Ok(Json(ApiResponse::success(Some(found.into()), None, None)))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateSchoolUserDto,
    responses(
        (status = 200, description = "User created", body = ApiResponse<SchoolUserResponseDto>),
        (status = 409, description = "Email already used in this agency")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn create_user(
    State(service): State<Arc<SchoolUserService>>,
    RequireAgencyAdmin(user): RequireAgencyAdmin,
    AppJson(dto): AppJson<CreateSchoolUserDto>,
) -> Result<Json<ApiResponse<SchoolUserResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let agency_id = user.require_agency(dto.agency_id)?;
    let created = service.create(agency_id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(created),
        Some("User created".to_string()),
        None,
    )))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateSchoolUserDto,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<SchoolUserResponseDto>),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_user(
    State(service): State<Arc<SchoolUserService>>,
    RequireAgencyAdmin(user): RequireAgencyAdmin,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateSchoolUserDto>,
) -> Result<Json<ApiResponse<SchoolUserResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let existing = service.get(id).await?;
    user.ensure_agency_access(existing.agency_id)?;

    let updated = service.update(&existing, dto).await?;
    Ok(Json(ApiResponse::success(Some(updated), None, None)))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn delete_user(
    State(service): State<Arc<SchoolUserService>>,
    RequireAgencyAdmin(user): RequireAgencyAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    let existing = service.get(id).await?;
    user.ensure_agency_access(existing.agency_id)?;

    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("User deleted".to_string()),
        None,
    )))
}
