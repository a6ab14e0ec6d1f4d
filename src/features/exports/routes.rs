use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::exports::handlers;
use crate::features::exports::services::ExportService;

pub fn routes(service: Arc<ExportService>) -> Router {
    Router::new()
        .route(
            "/api/submissions/export",
            post(handlers::export_submissions),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ExportConfig;
    use crate::features::reports::ReportService;
    use crate::features::schools::SchoolService;
    use crate::features::submissions::SubmissionService;
    use crate::features::users::SchoolUserService;
    use crate::modules::storage::MemoryFileStore;
    use crate::shared::test_helpers::{
        create_agency_admin_user, lazy_pool, test_storage, with_super_admin_auth, with_user,
    };
    use axum_test::TestServer;
    use serde_json::json;
    use uuid::Uuid;

    async fn service() -> Arc<ExportService> {
        let pool = lazy_pool();
        let submissions = Arc::new(SubmissionService::new(
            pool.clone(),
            Arc::new(SchoolService::new(pool.clone())),
            Arc::new(SchoolUserService::new(pool.clone())),
            Arc::new(ReportService::new(pool.clone())),
            test_storage().await,
        ));
        Arc::new(ExportService::new(
            submissions,
            Arc::new(MemoryFileStore::default()),
            ExportConfig {
                max_submissions: 2,
                summary_filename: "summary.xlsx".to_string(),
            },
        ))
    }

    #[tokio::test]
    async fn test_requires_authentication() {
        let server = TestServer::new(routes(service().await)).unwrap();
        server
            .post("/api/submissions/export")
            .json(&json!({ "submission_ids": [Uuid::new_v4()] }))
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_empty_selection_is_rejected() {
        let app = with_user(routes(service().await), create_agency_admin_user(Uuid::new_v4()));
        let server = TestServer::new(app).unwrap();
        server
            .post("/api/submissions/export")
            .json(&json!({ "submission_ids": [] }))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_selection_over_limit_is_rejected() {
        let app = with_user(routes(service().await), create_agency_admin_user(Uuid::new_v4()));
        let server = TestServer::new(app).unwrap();
        server
            .post("/api/submissions/export")
            .json(&json!({
                "submission_ids": [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()]
            }))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_super_admin_must_name_agency() {
        let server = TestServer::new(with_super_admin_auth(routes(service().await))).unwrap();
        server
            .post("/api/submissions/export")
            .json(&json!({ "select_all": true }))
            .await
            .assert_status_bad_request();
    }
}
