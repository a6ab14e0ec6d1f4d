use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::schools::handlers;
use crate::features::schools::services::SchoolService;

pub fn routes(service: Arc<SchoolService>) -> Router {
    Router::new()
        .route(
            "/api/schools",
            get(handlers::list_schools).post(handlers::create_school),
        )
        .route(
            "/api/schools/{id}",
            get(handlers::get_school)
                .put(handlers::update_school)
                .delete(handlers::delete_school),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{
        create_team_member_user, lazy_pool, with_super_admin_auth, with_user,
    };
    use axum_test::TestServer;
    use serde_json::json;
    use uuid::Uuid;

    fn service() -> Arc<SchoolService> {
        Arc::new(SchoolService::new(lazy_pool()))
    }

    #[tokio::test]
    async fn test_team_member_cannot_create_school() {
        let app = with_user(routes(service()), create_team_member_user(Uuid::new_v4()));
        let server = TestServer::new(app).unwrap();
        server
            .post("/api/schools")
            .json(&json!({ "name": "Lincoln Elementary", "gradeserved": ["K", "1"] }))
            .await
            .assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_super_admin_must_name_an_agency() {
        let server = TestServer::new(with_super_admin_auth(routes(service()))).unwrap();
        server.get("/api/schools").await.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_staff_cannot_list_foreign_agency() {
        let app = with_user(routes(service()), create_team_member_user(Uuid::new_v4()));
        let server = TestServer::new(app).unwrap();
        server
            .get("/api/schools")
            .add_query_param("agency_id", Uuid::new_v4())
            .await
            .assert_status_forbidden();
    }
}
