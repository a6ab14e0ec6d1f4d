use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct School {
    pub id: Uuid,
    pub agency_id: Uuid,
    pub name: String,
    /// Grade labels: PK, K, 1..12
    pub gradeserved: Vec<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
