use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Create routes for the categories feature
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/api/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/api/categories/{id}",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{create_agency_admin_user, lazy_pool, with_user};
    use axum_test::TestServer;
    use serde_json::json;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_color_must_be_hex() {
        let service = Arc::new(CategoryService::new(lazy_pool()));
        let app = with_user(routes(service), create_agency_admin_user(Uuid::new_v4()));
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/categories")
            .json(&json!({ "name": "Safety", "color": "red" }))
            .await;
        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }
}
