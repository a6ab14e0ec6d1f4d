use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::submissions::grouping::{SubmissionFilters, ViewMode};

/// Which submissions to bundle. With `select_all` the grouped view for
/// `filters` and `view` decides; otherwise `submission_ids` does.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ExportRequestDto {
    pub agency_id: Option<Uuid>,
    #[serde(default)]
    pub submission_ids: Vec<Uuid>,
    #[serde(default)]
    pub select_all: bool,
    #[serde(default)]
    pub filters: SubmissionFilters,
    #[serde(default)]
    pub view: ViewMode,
}
