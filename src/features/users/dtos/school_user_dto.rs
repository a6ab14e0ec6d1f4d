use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::users::models::{SchoolUser, SchoolUserRole};
use crate::shared::types::{default_page, default_page_size, PaginationQuery};

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListSchoolUsersQuery {
    pub agency_id: Option<Uuid>,
    pub role: Option<SchoolUserRole>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl ListSchoolUsersQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSchoolUserDto {
    pub agency_id: Option<Uuid>,
    pub school_id: Option<Uuid>,

    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,

    #[validate(length(max = 100, message = "Last name must not exceed 100 characters"))]
    #[serde(default)]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default = "default_role")]
    pub role: SchoolUserRole,
}

fn default_role() -> SchoolUserRole {
    SchoolUserRole::TeamMember
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateSchoolUserDto {
    pub school_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = 100, message = "Last name must not exceed 100 characters"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub role: Option<SchoolUserRole>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SchoolUserResponseDto {
    pub id: Uuid,
    pub agency_id: Uuid,
    pub school_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub email: String,
    pub role: SchoolUserRole,
    pub created_at: DateTime<Utc>,
}

impl From<SchoolUser> for SchoolUserResponseDto {
    fn from(u: SchoolUser) -> Self {
        Self {
            display_name: u.display_name(),
            id: u.id,
            agency_id: u.agency_id,
            school_id: u.school_id,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            role: u.role,
            created_at: u.created_at,
        }
    }
}
