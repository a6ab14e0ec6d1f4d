use crate::features::auth::handler;
use axum::{routing::get, Router};

/// Protected auth routes (require JWT authentication)
pub fn protected_routes() -> Router {
    Router::new().route("/api/auth/me", get(handler::get_me))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{create_agency_admin_user, with_user};
    use axum_test::TestServer;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_me_reports_agency_and_admin_flag() {
        let agency = Uuid::new_v4();
        let app = with_user(protected_routes(), create_agency_admin_user(agency));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/auth/me").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["agency_id"], agency.to_string());
        assert_eq!(body["data"]["is_admin"], true);
    }
}
