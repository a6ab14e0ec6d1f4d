use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::agencies::{dtos as agencies_dtos, handlers as agencies_handlers};
use crate::features::auth;
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::documents::{dtos as documents_dtos, handlers as documents_handlers};
use crate::features::exports::{dtos as exports_dtos, handlers as exports_handlers};
use crate::features::reports::{dtos as reports_dtos, handlers as reports_handlers};
use crate::features::schools::{dtos as schools_dtos, handlers as schools_handlers};
use crate::features::submissions::{
    dtos as submissions_dtos, grouping as submissions_grouping, handlers as submissions_handlers,
    models as submissions_models, progress as submissions_progress,
};
use crate::features::transparency::{dtos as transparency_dtos, handlers as transparency_handlers};
use crate::features::users::{
    dtos as users_dtos, handlers as users_handlers, models as users_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handler::get_me,
        // Agencies
        agencies_handlers::list_agencies,
        agencies_handlers::get_agency,
        agencies_handlers::create_agency,
        agencies_handlers::update_agency,
        // Schools
        schools_handlers::list_schools,
        schools_handlers::get_school,
        schools_handlers::create_school,
        schools_handlers::update_school,
        schools_handlers::delete_school,
        // School users
        users_handlers::list_users,
        users_handlers::get_user,
        users_handlers::create_user,
        users_handlers::update_user,
        users_handlers::delete_user,
        // Categories
        categories_handlers::list_categories,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        // Reports
        reports_handlers::list_reports,
        reports_handlers::get_report,
        reports_handlers::create_report,
        reports_handlers::update_report,
        reports_handlers::delete_report,
        reports_handlers::add_schedule,
        reports_handlers::remove_schedule,
        reports_handlers::assign_schools,
        // Submissions
        submissions_handlers::list_submissions,
        submissions_handlers::grouped_submissions,
        submissions_handlers::get_submission,
        submissions_handlers::assign_submission,
        submissions_handlers::bulk_assign_submissions,
        submissions_handlers::update_submission_status,
        submissions_handlers::upload_submission_file,
        submissions_handlers::remove_submission_file,
        exports_handlers::export_submissions,
        // Documents
        documents_handlers::list_documents,
        documents_handlers::upload_document,
        documents_handlers::update_document,
        documents_handlers::delete_document,
        // Transparency (public)
        transparency_handlers::get_school_transparency,
        transparency_handlers::get_document_details,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::dto::MeResponseDto,
            auth::model::AuthenticatedUser,
            ApiResponse<auth::dto::MeResponseDto>,
            // Agencies
            agencies_dtos::CreateAgencyDto,
            agencies_dtos::UpdateAgencyDto,
            agencies_dtos::AgencyResponseDto,
            ApiResponse<Vec<agencies_dtos::AgencyResponseDto>>,
            ApiResponse<agencies_dtos::AgencyResponseDto>,
            // Schools
            schools_dtos::CreateSchoolDto,
            schools_dtos::UpdateSchoolDto,
            schools_dtos::SchoolResponseDto,
            ApiResponse<Vec<schools_dtos::SchoolResponseDto>>,
            ApiResponse<schools_dtos::SchoolResponseDto>,
            // School users
            users_models::SchoolUserRole,
            users_dtos::CreateSchoolUserDto,
            users_dtos::UpdateSchoolUserDto,
            users_dtos::SchoolUserResponseDto,
            ApiResponse<Vec<users_dtos::SchoolUserResponseDto>>,
            ApiResponse<users_dtos::SchoolUserResponseDto>,
            // Categories
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            categories_dtos::CategoryResponseDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            // Reports
            reports_dtos::CreateScheduleDto,
            reports_dtos::CreateReportDto,
            reports_dtos::UpdateReportDto,
            reports_dtos::AssignSchoolsDto,
            reports_dtos::AssignSchoolsResponseDto,
            reports_dtos::ScheduleResponseDto,
            reports_dtos::ReportResponseDto,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<reports_dtos::ScheduleResponseDto>,
            ApiResponse<reports_dtos::AssignSchoolsResponseDto>,
            // Submissions
            submissions_models::SubmissionStatus,
            submissions_grouping::ViewMode,
            submissions_grouping::SubmissionFilters,
            submissions_progress::ProgressSegment,
            submissions_progress::ProgressSummary,
            submissions_dtos::SubmissionResponseDto,
            submissions_dtos::SubmissionDetailDto,
            submissions_dtos::SubmissionRowDto,
            submissions_dtos::SubmissionGroupDto,
            submissions_dtos::GroupedViewDto,
            submissions_dtos::AssignMemberDto,
            submissions_dtos::BulkAssignDto,
            submissions_dtos::BulkAssignResponseDto,
            submissions_dtos::UpdateStatusDto,
            submissions_dtos::RemoveFileDto,
            exports_dtos::ExportRequestDto,
            ApiResponse<Vec<submissions_dtos::SubmissionResponseDto>>,
            ApiResponse<submissions_dtos::SubmissionResponseDto>,
            ApiResponse<submissions_dtos::SubmissionDetailDto>,
            ApiResponse<submissions_dtos::GroupedViewDto>,
            ApiResponse<submissions_dtos::BulkAssignResponseDto>,
            // Documents
            documents_dtos::UpdateDocumentDto,
            documents_dtos::DocumentResponseDto,
            ApiResponse<Vec<documents_dtos::DocumentResponseDto>>,
            ApiResponse<documents_dtos::DocumentResponseDto>,
            // Transparency
            transparency_dtos::PublicSchoolDto,
            transparency_dtos::PublicDocumentDto,
            transparency_dtos::DocumentSectionDto,
            transparency_dtos::SchoolTransparencyDto,
            transparency_dtos::DocumentDetailDto,
            ApiResponse<transparency_dtos::SchoolTransparencyDto>,
            ApiResponse<transparency_dtos::DocumentDetailDto>,
        )
    ),
    tags(
        (name = "auth", description = "Authenticated user"),
        (name = "agencies", description = "Agencies (tenants)"),
        (name = "schools", description = "Schools of an agency"),
        (name = "users", description = "School users and team members"),
        (name = "categories", description = "Report categories"),
        (name = "reports", description = "Reports, schedules and school assignment"),
        (name = "submissions", description = "Submission workflow, grouped view and export"),
        (name = "documents", description = "Transparency documents"),
        (name = "transparency", description = "Public transparency pages"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Report Well API",
        version = "0.1.0",
        description = "Compliance reporting portal for school agencies",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Overrides the document info with configured values
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_feature_and_bearer_auth() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/api/submissions/grouped",
            "/api/submissions/export",
            "/api/reports/{id}/assign",
            "/api/transparency/schools/{id}",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing path {}",
                expected
            );
        }

        let schemes = &doc.components.as_ref().unwrap().security_schemes;
        assert!(schemes.contains_key("bearer_auth"));
    }
}
