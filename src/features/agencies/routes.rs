use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::agencies::handlers;
use crate::features::agencies::services::AgencyService;

pub fn routes(service: Arc<AgencyService>) -> Router {
    Router::new()
        .route(
            "/api/agencies",
            get(handlers::list_agencies).post(handlers::create_agency),
        )
        .route(
            "/api/agencies/{id}",
            put(handlers::update_agency).get(handlers::get_agency),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{
        create_agency_admin_user, create_team_member_user, lazy_pool, with_user,
    };
    use axum_test::TestServer;
    use serde_json::json;
    use uuid::Uuid;

    fn server_for(user: crate::features::auth::model::AuthenticatedUser) -> TestServer {
        let service = Arc::new(AgencyService::new(lazy_pool()));
        TestServer::new(with_user(routes(service), user)).unwrap()
    }

    #[tokio::test]
    async fn test_list_requires_super_admin() {
        let server = server_for(create_agency_admin_user(Uuid::new_v4()));
        server.get("/api/agencies").await.assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_staff_cannot_read_other_agency() {
        let server = server_for(create_team_member_user(Uuid::new_v4()));
        server
            .get(&format!("/api/agencies/{}", Uuid::new_v4()))
            .await
            .assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_create_requires_super_admin() {
        let server = server_for(create_agency_admin_user(Uuid::new_v4()));
        server
            .post("/api/agencies")
            .json(&json!({ "name": "Springfield", "slug": "springfield" }))
            .await
            .assert_status_forbidden();
    }
}
