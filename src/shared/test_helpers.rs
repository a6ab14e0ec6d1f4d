use axum::{extract::Request, middleware::Next, response::Response, Router};
use uuid::Uuid;

use crate::features::auth::model::AuthenticatedUser;
use crate::shared::constants::{ROLE_AGENCY_ADMIN, ROLE_SUPER_ADMIN, ROLE_TEAM_MEMBER};

pub fn create_super_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        account_id: "test-account-id".to_string(),
        sub: "test-sub".to_string(),
        roles: vec![ROLE_SUPER_ADMIN.to_string()],
        agency_id: None,
    }
}

pub fn create_agency_admin_user(agency_id: Uuid) -> AuthenticatedUser {
    AuthenticatedUser {
        account_id: "agency-admin-account".to_string(),
        sub: "agency-admin-sub".to_string(),
        roles: vec![ROLE_AGENCY_ADMIN.to_string()],
        agency_id: Some(agency_id),
    }
}

pub fn create_team_member_user(agency_id: Uuid) -> AuthenticatedUser {
    AuthenticatedUser {
        account_id: "team-member-account".to_string(),
        sub: "team-member-sub".to_string(),
        roles: vec![ROLE_TEAM_MEMBER.to_string()],
        agency_id: Some(agency_id),
    }
}

/// Wrap a router so every request carries `user`
pub fn with_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                let response: Response = next.run(request).await;
                response
            }
        },
    ))
}

pub fn with_super_admin_auth(router: Router) -> Router {
    with_user(router, create_super_admin_user())
}

/// Pool that never connects unless a query runs; for router tests that
/// are rejected before reaching the database
pub fn lazy_pool() -> sqlx::PgPool {
    sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://localhost/reportwell_test")
        .unwrap()
}

/// Storage client pointed at a local endpoint; building it makes no requests
pub async fn test_storage() -> std::sync::Arc<crate::modules::storage::MinIOClient> {
    let config = crate::core::config::StorageConfig {
        endpoint: "http://localhost:9000".to_string(),
        public_endpoint: "http://files.localhost".to_string(),
        access_key: "test-access".to_string(),
        secret_key: "test-secret".to_string(),
        bucket: "reportwell-test".to_string(),
        region: "us-east-1".to_string(),
        public_prefix: "public".to_string(),
        private_prefix: "private".to_string(),
        presigned_url_expiry_secs: 300,
    };
    std::sync::Arc::new(
        crate::modules::storage::MinIOClient::new(config)
            .await
            .unwrap(),
    )
}
