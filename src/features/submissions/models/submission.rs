use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Submission status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "submission_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Incompleted,
    Pending,
    Returned,
    Completed,
}

impl SubmissionStatus {
    /// Display order of progress segments
    pub const ORDERED: [SubmissionStatus; 4] = [
        SubmissionStatus::Incompleted,
        SubmissionStatus::Pending,
        SubmissionStatus::Returned,
        SubmissionStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Incompleted => "incompleted",
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Returned => "returned",
            SubmissionStatus::Completed => "completed",
        }
    }

    /// Review workflow: a school submits, the agency accepts or sends it back
    pub fn can_transition_to(&self, next: SubmissionStatus) -> bool {
        use SubmissionStatus::*;
        matches!(
            (self, next),
            (Incompleted, Pending)
                | (Pending, Completed)
                | (Pending, Returned)
                | (Returned, Pending)
                | (Completed, Returned)
        )
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database model for a submission
#[derive(Debug, Clone, FromRow)]
pub struct Submission {
    pub id: Uuid,
    pub agency_id: Uuid,
    pub report_id: Uuid,
    pub report_schedule_id: Uuid,
    pub school_id: Uuid,
    pub assigned_member_id: Option<Uuid>,
    pub status: SubmissionStatus,
    pub due_date: NaiveDate,
    pub school_submission_date: Option<NaiveDate>,
    pub file_urls: Vec<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use SubmissionStatus::*;

    #[test]
    fn test_allowed_transitions() {
        assert!(Incompleted.can_transition_to(Pending));
        assert!(Pending.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Returned));
        assert!(Returned.can_transition_to(Pending));
        assert!(Completed.can_transition_to(Returned));
    }

    #[test]
    fn test_rejected_transitions() {
        assert!(!Incompleted.can_transition_to(Completed));
        assert!(!Incompleted.can_transition_to(Returned));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Returned.can_transition_to(Completed));
        for status in SubmissionStatus::ORDERED {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn test_status_strings_match_serde() {
        for status in SubmissionStatus::ORDERED {
            assert_eq!(
                serde_json::to_value(status).unwrap(),
                serde_json::Value::from(status.as_str())
            );
        }
    }
}
