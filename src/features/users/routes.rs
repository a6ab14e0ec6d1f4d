use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::users::handlers;
use crate::features::users::services::SchoolUserService;

pub fn routes(service: Arc<SchoolUserService>) -> Router {
    Router::new()
        .route(
            "/api/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/api/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{create_agency_admin_user, create_team_member_user, lazy_pool, with_user};
    use axum_test::TestServer;
    use serde_json::json;
    use uuid::Uuid;

    fn server_for(user: crate::features::auth::model::AuthenticatedUser) -> TestServer {
        let service = Arc::new(SchoolUserService::new(lazy_pool()));
        TestServer::new(with_user(routes(service), user)).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected() {
        let server = server_for(create_agency_admin_user(Uuid::new_v4()));
        server
            .post("/api/users")
            .json(&json!({ "first_name": "Ada", "email": "not-an-email" }))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_unknown_role_filter_is_rejected() {
        let server = server_for(create_team_member_user(Uuid::new_v4()));
        server
            .get("/api/users")
            .add_query_param("role", "principal")
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_team_member_cannot_delete_users() {
        let server = server_for(create_team_member_user(Uuid::new_v4()));
        server
            .delete(&format!("/api/users/{}", Uuid::new_v4()))
            .await
            .assert_status_forbidden();
    }
}
