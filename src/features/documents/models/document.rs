use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A file a school publishes on its transparency page
#[derive(Debug, Clone, FromRow)]
pub struct Document {
    pub id: Uuid,
    pub school_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub file_key: String,
    pub content_type: String,
    pub file_size: i64,
    /// Hex SHA-256 of the contents
    pub checksum: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
