use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::submissions::handlers;
use crate::features::submissions::services::SubmissionService;

pub fn routes(service: Arc<SubmissionService>) -> Router {
    Router::new()
        .route("/api/submissions", get(handlers::list_submissions))
        .route(
            "/api/submissions/grouped",
            get(handlers::grouped_submissions),
        )
        .route(
            "/api/submissions/assign",
            post(handlers::bulk_assign_submissions),
        )
        .route("/api/submissions/{id}", get(handlers::get_submission))
        .route(
            "/api/submissions/{id}/assign",
            patch(handlers::assign_submission),
        )
        .route(
            "/api/submissions/{id}/status",
            patch(handlers::update_submission_status),
        )
        .route(
            "/api/submissions/{id}/files",
            post(handlers::upload_submission_file).delete(handlers::remove_submission_file),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::ReportService;
    use crate::features::schools::SchoolService;
    use crate::features::users::SchoolUserService;
    use crate::shared::test_helpers::{
        create_team_member_user, lazy_pool, test_storage, with_super_admin_auth, with_user,
    };
    use axum_test::TestServer;
    use serde_json::json;
    use uuid::Uuid;

    async fn service() -> Arc<SubmissionService> {
        let pool = lazy_pool();
        Arc::new(SubmissionService::new(
            pool.clone(),
            Arc::new(SchoolService::new(pool.clone())),
            Arc::new(SchoolUserService::new(pool.clone())),
            Arc::new(ReportService::new(pool.clone())),
            test_storage().await,
        ))
    }

    #[tokio::test]
    async fn test_unknown_view_is_rejected() {
        let app = with_user(routes(service().await), create_team_member_user(Uuid::new_v4()));
        let server = TestServer::new(app).unwrap();
        server
            .get("/api/submissions/grouped")
            .add_query_param("view", "district")
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_super_admin_grouped_view_needs_agency() {
        let server = TestServer::new(with_super_admin_auth(routes(service().await))).unwrap();
        server
            .get("/api/submissions/grouped")
            .add_query_param("view", "report")
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_team_member_cannot_bulk_assign() {
        let app = with_user(routes(service().await), create_team_member_user(Uuid::new_v4()));
        let server = TestServer::new(app).unwrap();
        server
            .post("/api/submissions/assign")
            .json(&json!({ "submission_ids": [Uuid::new_v4()], "member_id": null }))
            .await
            .assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_unknown_status_is_rejected() {
        let app = with_user(routes(service().await), create_team_member_user(Uuid::new_v4()));
        let server = TestServer::new(app).unwrap();
        server
            .patch(&format!("/api/submissions/{}/status", Uuid::new_v4()))
            .json(&json!({ "status": "archived" }))
            .await
            .assert_status_bad_request();
    }
}
