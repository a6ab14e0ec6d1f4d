use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "school_user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SchoolUserRole {
    AgencyAdmin,
    SchoolAdmin,
    TeamMember,
}

#[derive(Debug, Clone, FromRow)]
pub struct SchoolUser {
    pub id: Uuid,
    pub agency_id: Uuid,
    pub school_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: SchoolUserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SchoolUser {
    /// "First Last", trimmed; what the team-member filter matches against
    pub fn display_name(&self) -> String {
        display_name(&self.first_name, &self.last_name)
    }
}

pub fn display_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name.trim(), last_name.trim())
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_trims_missing_parts() {
        assert_eq!(display_name("Ada", "Lovelace"), "Ada Lovelace");
        assert_eq!(display_name(" Ada ", ""), "Ada");
        assert_eq!(display_name("", "Lovelace"), "Lovelace");
    }

    #[test]
    fn test_role_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(SchoolUserRole::TeamMember).unwrap(),
            "team_member"
        );
    }
}
