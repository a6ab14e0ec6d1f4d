use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::documents::models::Document;
use crate::features::schools::models::School;

/// What the public sees of a school
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicSchoolDto {
    pub id: Uuid,
    pub name: String,
    pub gradeserved: Vec<String>,
    pub address: Option<String>,
}

impl From<School> for PublicSchoolDto {
    fn from(s: School) -> Self {
        Self {
            id: s.id,
            name: s.name,
            gradeserved: s.gradeserved,
            address: s.address,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicDocumentDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub content_type: String,
    pub file_size: i64,
    pub file_url: String,
    pub published_at: DateTime<Utc>,
}

impl From<Document> for PublicDocumentDto {
    fn from(d: Document) -> Self {
        Self {
            id: d.id,
            title: d.title,
            description: d.description,
            content_type: d.content_type,
            file_size: d.file_size,
            file_url: d.file_url,
            published_at: d.updated_at,
        }
    }
}

/// Documents under one category; `category` is null for the
/// uncategorized section
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentSectionDto {
    pub category: Option<CategoryResponseDto>,
    pub documents: Vec<PublicDocumentDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SchoolTransparencyDto {
    pub school: PublicSchoolDto,
    pub sections: Vec<DocumentSectionDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentDetailDto {
    #[serde(flatten)]
    pub document: PublicDocumentDto,
    pub school: PublicSchoolDto,
    pub category: Option<CategoryResponseDto>,
    /// Presigned, expires after the configured time
    pub download_url: String,
}
