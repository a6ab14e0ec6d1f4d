use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// One dated instance of a report template
#[derive(Debug, Clone, FromRow)]
pub struct ReportSchedule {
    pub id: Uuid,
    pub report_id: Uuid,
    pub schedule_time: NaiveDate,
    /// Overrides the report name for this instance when non-empty
    pub report_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ReportSchedule {
    pub fn display_name(&self, report_name: &str) -> String {
        schedule_display_name(self.report_name.as_deref(), report_name, self.schedule_time)
    }
}

/// `"{name} (YYYY-MM-DD)"`, preferring the schedule's own name
pub fn schedule_display_name(
    schedule_name: Option<&str>,
    report_name: &str,
    schedule_time: NaiveDate,
) -> String {
    let name = schedule_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(report_name);
    format!("{} ({})", name, schedule_time.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
    }

    #[test]
    fn test_schedule_name_wins_when_present() {
        assert_eq!(
            schedule_display_name(Some("Fall Safety Drill"), "Safety Drill", date()),
            "Fall Safety Drill (2024-09-01)"
        );
    }

    #[test]
    fn test_blank_schedule_name_falls_back_to_report() {
        assert_eq!(
            schedule_display_name(Some("  "), "Safety Drill", date()),
            "Safety Drill (2024-09-01)"
        );
        assert_eq!(
            schedule_display_name(None, "Safety Drill", date()),
            "Safety Drill (2024-09-01)"
        );
    }
}
