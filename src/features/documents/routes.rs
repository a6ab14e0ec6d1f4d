use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::documents::handlers;
use crate::features::documents::services::DocumentService;

pub fn routes(service: Arc<DocumentService>) -> Router {
    Router::new()
        .route(
            "/api/documents",
            get(handlers::list_documents).post(handlers::upload_document),
        )
        .route(
            "/api/documents/{id}",
            patch(handlers::update_document).delete(handlers::delete_document),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::CategoryService;
    use crate::features::schools::SchoolService;
    use crate::shared::test_helpers::{create_team_member_user, lazy_pool, test_storage, with_user};
    use axum_test::multipart::MultipartForm;
    use axum_test::TestServer;
    use serde_json::json;
    use uuid::Uuid;

    async fn server() -> TestServer {
        let pool = lazy_pool();
        let service = Arc::new(DocumentService::new(
            pool.clone(),
            Arc::new(SchoolService::new(pool.clone())),
            Arc::new(CategoryService::new(pool.clone())),
            test_storage().await,
        ));
        let app = with_user(routes(service), create_team_member_user(Uuid::new_v4()));
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_team_member_cannot_delete() {
        server()
            .await
            .delete(&format!("/api/documents/{}", Uuid::new_v4()))
            .await
            .assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_upload_without_school_is_rejected() {
        let form = MultipartForm::new().add_text("title", "Annual Budget");
        server()
            .await
            .post("/api/documents")
            .multipart(form)
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_blank_title_update_is_rejected() {
        server()
            .await
            .patch(&format!("/api/documents/{}", Uuid::new_v4()))
            .json(&json!({ "title": "" }))
            .await
            .assert_status_bad_request();
    }
}
