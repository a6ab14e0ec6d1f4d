use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::transparency::dtos::{DocumentDetailDto, SchoolTransparencyDto};
use crate::features::transparency::services::TransparencyService;
use crate::shared::types::ApiResponse;

/// Public profile of a school with its published documents
#[utoipa::path(
    get,
    path = "/api/transparency/schools/{id}",
    params(("id" = Uuid, Path, description = "School ID")),
    responses(
        (status = 200, description = "School transparency page", body = ApiResponse<SchoolTransparencyDto>),
        (status = 404, description = "School not found")
    ),
    tag = "transparency"
)]
pub async fn get_school_transparency(
    State(service): State<Arc<TransparencyService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SchoolTransparencyDto>>> {
    let page = service.school(id).await?;
    Ok(Json(ApiResponse::success(Some(page), None, None)))
}

/// One published document with a download link
#[utoipa::path(
    get,
    path = "/api/transparency/details/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document", body = ApiResponse<DocumentDetailDto>),
        (status = 404, description = "Document not found or not published")
    ),
    tag = "transparency"
)]
pub async fn get_document_details(
    State(service): State<Arc<TransparencyService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DocumentDetailDto>>> {
    let detail = service.document(id).await?;
    Ok(Json(ApiResponse::success(Some(detail), None, None)))
}
