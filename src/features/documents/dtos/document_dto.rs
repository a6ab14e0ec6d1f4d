use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::documents::models::Document;
use crate::shared::uploads::UploadForm;

const MAX_TITLE_LEN: usize = 200;

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListDocumentsQuery {
    pub school_id: Uuid,
    /// Only published (`true`) or only drafts (`false`)
    pub published: Option<bool>,
}

/// Text parts of the upload form
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentUpload {
    pub school_id: Uuid,
    pub title: String,
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
    pub is_published: bool,
}

impl DocumentUpload {
    pub fn from_form(form: &UploadForm) -> Result<Self, AppError> {
        let school_id = form
            .text("school_id")
            .ok_or_else(|| AppError::BadRequest("school_id is required".to_string()))
            .and_then(|v| parse_uuid("school_id", v))?;

        let title = form
            .text("title")
            .ok_or_else(|| AppError::BadRequest("title is required".to_string()))?;
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(AppError::Validation(format!(
                "Title must be at most {} characters",
                MAX_TITLE_LEN
            )));
        }

        let category_id = form
            .text("category_id")
            .map(|v| parse_uuid("category_id", v))
            .transpose()?;

        let is_published = form
            .text("published")
            .map(parse_flag)
            .transpose()?
            .unwrap_or(false);

        Ok(Self {
            school_id,
            title: title.to_string(),
            category_id,
            description: form.text("description").map(str::to_string),
            is_published,
        })
    }
}

fn parse_uuid(field: &str, value: &str) -> Result<Uuid, AppError> {
    value
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{} must be a UUID", field)))
}

fn parse_flag(value: &str) -> Result<bool, AppError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        other => Err(AppError::BadRequest(format!(
            "published must be a boolean, got '{}'",
            other
        ))),
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateDocumentDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    /// Publishing moves the file to public storage, unpublishing back
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentResponseDto {
    pub id: Uuid,
    pub school_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub content_type: String,
    pub file_size: i64,
    pub checksum: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponseDto {
    fn from(d: Document) -> Self {
        Self {
            id: d.id,
            school_id: d.school_id,
            category_id: d.category_id,
            title: d.title,
            description: d.description,
            file_url: d.file_url,
            content_type: d.content_type,
            file_size: d.file_size,
            checksum: d.checksum,
            is_published: d.is_published,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(fields: &[(&str, &str)]) -> UploadForm {
        UploadForm {
            file: None,
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_upload_fields_are_parsed() {
        let school = Uuid::new_v4();
        let category = Uuid::new_v4();
        let upload = DocumentUpload::from_form(&form(&[
            ("school_id", &school.to_string()),
            ("title", " Annual Budget "),
            ("category_id", &category.to_string()),
            ("description", ""),
            ("published", "on"),
        ]))
        .unwrap();

        assert_eq!(
            upload,
            DocumentUpload {
                school_id: school,
                title: "Annual Budget".to_string(),
                category_id: Some(category),
                description: None,
                is_published: true,
            }
        );
    }

    #[test]
    fn test_missing_or_malformed_fields() {
        assert!(DocumentUpload::from_form(&form(&[("title", "x")])).is_err());
        assert!(DocumentUpload::from_form(&form(&[("school_id", "nope"), ("title", "x")])).is_err());

        let school = Uuid::new_v4().to_string();
        assert!(DocumentUpload::from_form(&form(&[("school_id", &school)])).is_err());
        assert!(DocumentUpload::from_form(&form(&[
            ("school_id", &school),
            ("title", "x"),
            ("published", "maybe"),
        ]))
        .is_err());

        let upload =
            DocumentUpload::from_form(&form(&[("school_id", &school), ("title", "x")])).unwrap();
        assert!(!upload.is_published);
        assert!(upload.category_id.is_none());
    }
}
