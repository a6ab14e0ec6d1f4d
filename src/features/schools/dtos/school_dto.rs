use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::schools::models::School;
use crate::shared::types::{default_page, default_page_size, PaginationQuery};

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListSchoolsQuery {
    /// Required for super admins, ignored for everyone else
    pub agency_id: Option<Uuid>,
    /// Case-insensitive name filter
    pub search: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl ListSchoolsQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSchoolDto {
    pub agency_id: Option<Uuid>,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[serde(default)]
    pub gradeserved: Vec<String>,

    #[validate(length(max = 500, message = "Address must not exceed 500 characters"))]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateSchoolDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    pub gradeserved: Option<Vec<String>>,
    #[validate(length(max = 500, message = "Address must not exceed 500 characters"))]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SchoolResponseDto {
    pub id: Uuid,
    pub agency_id: Uuid,
    pub name: String,
    pub gradeserved: Vec<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<School> for SchoolResponseDto {
    fn from(s: School) -> Self {
        Self {
            id: s.id,
            agency_id: s.agency_id,
            name: s.name,
            gradeserved: s.gradeserved,
            address: s.address,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}
