use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::shared::constants::{
    ROLE_AGENCY_ADMIN, ROLE_SCHOOL_ADMIN, ROLE_SUPER_ADMIN, ROLE_TEAM_MEMBER,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub account_id: String,
    pub sub: String,
    pub roles: Vec<String>,
    /// Agency the user belongs to (absent for platform super admins)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agency_id: Option<Uuid>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_super_admin(&self) -> bool {
        self.has_role(ROLE_SUPER_ADMIN)
    }

    pub fn is_agency_admin(&self) -> bool {
        self.has_role(ROLE_AGENCY_ADMIN)
    }

    /// Super admin or agency admin
    pub fn has_admin_access(&self) -> bool {
        self.is_super_admin() || self.is_agency_admin()
    }

    /// Any role that works inside an agency
    pub fn has_staff_access(&self) -> bool {
        self.has_admin_access()
            || self.has_role(ROLE_SCHOOL_ADMIN)
            || self.has_role(ROLE_TEAM_MEMBER)
    }

    /// Resolve which agency a request may look at.
    ///
    /// Super admins get whatever they asked for (`None` = every agency).
    /// Everyone else is pinned to their own agency.
    pub fn scope_agency(&self, requested: Option<Uuid>) -> Result<Option<Uuid>, AppError> {
        if self.is_super_admin() {
            return Ok(requested);
        }

        let own = self
            .agency_id
            .ok_or_else(|| AppError::Forbidden("User is not attached to an agency".to_string()))?;

        match requested {
            Some(id) if id != own => Err(AppError::Forbidden(
                "Access to another agency is not allowed".to_string(),
            )),
            _ => Ok(Some(own)),
        }
    }

    /// Like [`scope_agency`](Self::scope_agency) but a concrete agency is required
    pub fn require_agency(&self, requested: Option<Uuid>) -> Result<Uuid, AppError> {
        self.scope_agency(requested)?
            .ok_or_else(|| AppError::BadRequest("agency_id is required".to_string()))
    }

    /// Fail unless the user may touch rows owned by `agency_id`
    pub fn ensure_agency_access(&self, agency_id: Uuid) -> Result<(), AppError> {
        self.scope_agency(Some(agency_id)).map(|_| ())
    }
}

/// Custom claims object carried under the configured namespace
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomClaims {
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub agency_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{
        create_agency_admin_user, create_super_admin_user, create_team_member_user,
    };

    #[test]
    fn test_super_admin_scope_is_unrestricted() {
        let user = create_super_admin_user();
        let other = Uuid::new_v4();
        assert_eq!(user.scope_agency(None).unwrap(), None);
        assert_eq!(user.scope_agency(Some(other)).unwrap(), Some(other));
    }

    #[test]
    fn test_agency_user_is_pinned_to_own_agency() {
        let agency = Uuid::new_v4();
        let user = create_team_member_user(agency);

        assert_eq!(user.scope_agency(None).unwrap(), Some(agency));
        assert_eq!(user.scope_agency(Some(agency)).unwrap(), Some(agency));
        assert!(matches!(
            user.scope_agency(Some(Uuid::new_v4())),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_require_agency_for_super_admin_needs_explicit_id() {
        let user = create_super_admin_user();
        assert!(matches!(
            user.require_agency(None),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_role_hierarchy() {
        let agency = Uuid::new_v4();
        let admin = create_agency_admin_user(agency);
        assert!(admin.has_admin_access());
        assert!(admin.has_staff_access());

        let member = create_team_member_user(agency);
        assert!(!member.has_admin_access());
        assert!(member.has_staff_access());
    }
}
