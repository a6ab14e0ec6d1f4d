use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::ReportSchedule;
use crate::features::categories::models::Category;

/// Database model for a report template
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub agency_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category linked to a report
#[derive(Debug, Clone, FromRow)]
pub struct ReportCategoryRow {
    pub report_id: Uuid,
    #[sqlx(flatten)]
    pub category: Category,
}

/// Report with its categories and schedules loaded
#[derive(Debug, Clone)]
pub struct ReportWithDetails {
    pub report: Report,
    pub categories: Vec<Category>,
    pub schedules: Vec<ReportSchedule>,
}

impl ReportWithDetails {
    /// Stitch reports together with their links; input order is kept
    pub fn assemble(
        reports: Vec<Report>,
        categories: Vec<ReportCategoryRow>,
        schedules: Vec<ReportSchedule>,
    ) -> Vec<Self> {
        reports
            .into_iter()
            .map(|report| {
                let categories = categories
                    .iter()
                    .filter(|row| row.report_id == report.id)
                    .map(|row| row.category.clone())
                    .collect();
                let schedules = schedules
                    .iter()
                    .filter(|s| s.report_id == report.id)
                    .cloned()
                    .collect();
                Self {
                    report,
                    categories,
                    schedules,
                }
            })
            .collect()
    }

    pub fn schedule(&self, schedule_id: Uuid) -> Option<&ReportSchedule> {
        self.schedules.iter().find(|s| s.id == schedule_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn report(name: &str) -> Report {
        Report {
            id: Uuid::new_v4(),
            agency_id: Uuid::nil(),
            name: name.to_string(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_assemble_attaches_links_to_their_report() {
        let safety = report("Safety Plan");
        let budget = report("Budget");
        let category = Category {
            id: Uuid::new_v4(),
            agency_id: Uuid::nil(),
            name: "Compliance".to_string(),
            color: "#FF0000".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let schedule = ReportSchedule {
            id: Uuid::new_v4(),
            report_id: budget.id,
            schedule_time: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            report_name: None,
            created_at: Utc::now(),
        };

        let assembled = ReportWithDetails::assemble(
            vec![safety.clone(), budget.clone()],
            vec![ReportCategoryRow {
                report_id: safety.id,
                category,
            }],
            vec![schedule.clone()],
        );

        assert_eq!(assembled[0].report.id, safety.id);
        assert_eq!(assembled[0].categories.len(), 1);
        assert!(assembled[0].schedules.is_empty());
        assert_eq!(assembled[1].schedules.len(), 1);
        assert!(assembled[1].schedule(schedule.id).is_some());
    }
}
