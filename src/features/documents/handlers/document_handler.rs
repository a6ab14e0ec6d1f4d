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
use crate::features::documents::dtos::{
    DocumentResponseDto, DocumentUpload, ListDocumentsQuery, UpdateDocumentDto,
};
use crate::features::documents::models::Document;
use crate::features::documents::services::DocumentService;
use crate::shared::types::ApiResponse;
use crate::shared::uploads::UploadForm;

async fn load_accessible(
    service: &DocumentService,
    user: &AuthenticatedUser,
    id: Uuid,
) -> Result<Document> {
    let document = service.get(id).await?;
    let school = service.school(document.school_id).await?;
    user.ensure_agency_access(school.agency_id)?;
    Ok(document)
}

/// List a school's documents
#[utoipa::path(
    get,
    path = "/api/documents",
    params(ListDocumentsQuery),
    responses(
        (status = 200, description = "Documents", body = ApiResponse<Vec<DocumentResponseDto>>),
    ),
    security(("bearer_auth" = [])),
    tag = "documents"
)]
pub async fn list_documents(
    State(service): State<Arc<DocumentService>>,
    RequireStaff(user): RequireStaff,
    AppQuery(query): AppQuery<ListDocumentsQuery>,
) -> Result<Json<ApiResponse<Vec<DocumentResponseDto>>>> {
    let school = service.school(query.school_id).await?;
    user.ensure_agency_access(school.agency_id)?;

    let documents = service.list(school.id, query.published).await?;
    Ok(Json(ApiResponse::success(
        Some(documents.into_iter().map(Into::into).collect()),
        None,
        None,
    )))
}

/// Upload a transparency document
///
/// Multipart parts: `file`, `school_id`, `title`, optional `category_id`,
/// `description` and `published`.
#[utoipa::path(
    post,
    path = "/api/documents",
    request_body(content_type = "multipart/form-data", description = "Document file and fields"),
    responses(
        (status = 201, description = "Document created", body = ApiResponse<DocumentResponseDto>),
        (status = 400, description = "Invalid form or file")
    ),
    security(("bearer_auth" = [])),
    tag = "documents"
)]
pub async fn upload_document(
    State(service): State<Arc<DocumentService>>,
    RequireStaff(user): RequireStaff,
    multipart: Multipart,
) -> Result<Json<ApiResponse<DocumentResponseDto>>> {
    let mut form = UploadForm::read(multipart).await?;
    let upload = DocumentUpload::from_form(&form)?;
    let file = form.take_file()?;

    let school = service.school(upload.school_id).await?;
    user.ensure_agency_access(school.agency_id)?;

    let document = service.create(&school, upload, file).await?;
    Ok(Json(ApiResponse::success(
        Some(document.into()),
        Some("Document uploaded".to_string()),
        None,
    )))
}

/// Edit a document's title, description or published flag
#[utoipa::path(
    patch,
    path = "/api/documents/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    request_body = UpdateDocumentDto,
    responses(
        (status = 200, description = "Document updated", body = ApiResponse<DocumentResponseDto>),
        (status = 404, description = "Document not found")
    ),
    security(("bearer_auth" = [])),
    tag = "documents"
)]
pub async fn update_document(
    State(service): State<Arc<DocumentService>>,
    RequireStaff(user): RequireStaff,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateDocumentDto>,
) -> Result<Json<ApiResponse<DocumentResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let document = load_accessible(&service, &user, id).await?;
    let updated = service.update(&document, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(updated.into()),
        Some("Document updated".to_string()),
        None,
    )))
}

/// Delete a document and its file
#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document deleted"),
        (status = 404, description = "Document not found")
    ),
    security(("bearer_auth" = [])),
    tag = "documents"
)]
pub async fn delete_document(
    State(service): State<Arc<DocumentService>>,
    RequireAgencyAdmin(user): RequireAgencyAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    let document = load_accessible(&service, &user, id).await?;
    service.delete(&document).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Document deleted".to_string()),
        None,
    )))
}
