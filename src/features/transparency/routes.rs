use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::transparency::handlers;
use crate::features::transparency::services::TransparencyService;

/// Public routes; mounted outside the auth middleware
pub fn routes(service: Arc<TransparencyService>) -> Router {
    Router::new()
        .route(
            "/api/transparency/schools/{id}",
            get(handlers::get_school_transparency),
        )
        .route(
            "/api/transparency/details/{id}",
            get(handlers::get_document_details),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::CategoryService;
    use crate::features::documents::DocumentService;
    use crate::features::schools::SchoolService;
    use crate::shared::test_helpers::{lazy_pool, test_storage};
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_malformed_id_is_rejected() {
        let pool = lazy_pool();
        let categories = Arc::new(CategoryService::new(pool.clone()));
        let documents = Arc::new(DocumentService::new(
            pool.clone(),
            Arc::new(SchoolService::new(pool.clone())),
            Arc::clone(&categories),
            test_storage().await,
        ));
        let server =
            TestServer::new(routes(Arc::new(TransparencyService::new(documents, categories))))
                .unwrap();

        server
            .get("/api/transparency/schools/not-a-uuid")
            .await
            .assert_status_bad_request();
        server
            .get("/api/transparency/details/42")
            .await
            .assert_status_bad_request();
    }
}
