//! Role-based authorization guards.
//!
//! Role hierarchy (from highest to lowest):
//! - super_admin: platform operator, every agency
//! - agency_admin: manages one agency (schools, reports, users)
//! - school_admin / team_member: work on submissions inside one agency

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

fn authenticated(parts: &Parts) -> Result<&AuthenticatedUser, AppError> {
    parts
        .extensions
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))
}

/// Only allows users with the "super_admin" role.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireSuperAdmin(user): RequireSuperAdmin) { ... }
/// ```
pub struct RequireSuperAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireSuperAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated(parts)?;

        if !user.is_super_admin() {
            return Err(AppError::Forbidden(
                "Super admin access required".to_string(),
            ));
        }

        Ok(RequireSuperAdmin(user.clone()))
    }
}

/// Allows "super_admin" or "agency_admin". Use for all mutations of
/// agency-owned reference data.
pub struct RequireAgencyAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAgencyAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated(parts)?;

        if !user.has_admin_access() {
            return Err(AppError::Forbidden(
                "Agency admin access required".to_string(),
            ));
        }

        Ok(RequireAgencyAdmin(user.clone()))
    }
}

/// Allows any agency role.
pub struct RequireStaff(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated(parts)?;

        if !user.has_staff_access() {
            return Err(AppError::Forbidden("Staff access required".to_string()));
        }

        Ok(RequireStaff(user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{
        create_agency_admin_user, create_team_member_user, with_super_admin_auth, with_user,
    };
    use axum::{routing::get, Router};
    use axum_test::TestServer;
    use uuid::Uuid;

    async fn super_only(RequireSuperAdmin(user): RequireSuperAdmin) -> String {
        user.sub
    }

    async fn admin_only(RequireAgencyAdmin(user): RequireAgencyAdmin) -> String {
        user.sub
    }

    async fn staff_only(RequireStaff(user): RequireStaff) -> String {
        user.sub
    }

    fn routes() -> Router {
        Router::new()
            .route("/super", get(super_only))
            .route("/admin", get(admin_only))
            .route("/staff", get(staff_only))
    }

    #[tokio::test]
    async fn test_missing_user_is_unauthorized() {
        let server = TestServer::new(routes()).unwrap();
        server.get("/staff").await.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_super_admin_passes_every_guard() {
        let server = TestServer::new(with_super_admin_auth(routes())).unwrap();
        server.get("/super").await.assert_status_ok();
        server.get("/admin").await.assert_status_ok();
        server.get("/staff").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_agency_admin_is_not_super_admin() {
        let app = with_user(routes(), create_agency_admin_user(Uuid::new_v4()));
        let server = TestServer::new(app).unwrap();
        server.get("/super").await.assert_status_forbidden();
        server.get("/admin").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_team_member_is_staff_only() {
        let app = with_user(routes(), create_team_member_user(Uuid::new_v4()));
        let server = TestServer::new(app).unwrap();
        server.get("/admin").await.assert_status_forbidden();
        server.get("/staff").await.assert_status_ok();
    }
}
