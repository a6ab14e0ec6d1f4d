use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireStaff;
use crate::features::exports::dtos::ExportRequestDto;
use crate::features::exports::services::ExportService;

/// Download selected submissions as a zip archive
///
/// The archive holds a summary sheet plus every attached file, foldered by
/// school and report schedule.
#[utoipa::path(
    post,
    path = "/api/submissions/export",
    request_body = ExportRequestDto,
    responses(
        (status = 200, description = "Zip archive", content_type = "application/zip", body = Vec<u8>),
        (status = 400, description = "Nothing selected or too many submissions"),
        (status = 404, description = "A selected submission or file was not found")
    ),
    security(("bearer_auth" = [])),
    tag = "submissions"
)]
pub async fn export_submissions(
    State(service): State<Arc<ExportService>>,
    RequireStaff(user): RequireStaff,
    AppJson(dto): AppJson<ExportRequestDto>,
) -> Result<Response> {
    let agency_id = user.require_agency(dto.agency_id)?;
    let bundle = service.export(agency_id, &dto).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", bundle.filename),
            ),
        ],
        bundle.bytes,
    )
        .into_response())
}
