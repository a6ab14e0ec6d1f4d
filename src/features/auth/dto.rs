use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::model::AuthenticatedUser;

/// DTO for /auth/me response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponseDto {
    pub account_id: String,
    pub sub: String,
    pub roles: Vec<String>,
    pub agency_id: Option<Uuid>,
    pub is_admin: bool,
}

impl From<AuthenticatedUser> for MeResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        let is_admin = user.has_admin_access();
        Self {
            account_id: user.account_id,
            sub: user.sub,
            roles: user.roles,
            agency_id: user.agency_id,
            is_admin,
        }
    }
}
