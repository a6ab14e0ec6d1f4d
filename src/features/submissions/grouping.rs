//! Grouped submission view.
//!
//! Takes an agency's flat submission list plus its reference data and
//! buckets it by school or by report schedule, applying the dashboard
//! filters on the way. Pure: no I/O, so the same function backs the
//! grouped endpoint and "select all" exports.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::categories::models::Category;
use crate::features::reports::models::ReportWithDetails;
use crate::features::schools::models::School;
use crate::features::submissions::models::Submission;
use crate::features::submissions::progress::ProgressSummary;
use crate::features::users::models::SchoolUser;

/// Pivot of the grouped view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    School,
    Report,
}

/// Dashboard filter state. Blank values are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SubmissionFilters {
    /// Exact status, e.g. `completed`
    pub status: Option<String>,
    /// Prefix of the due date, e.g. `2024` or `2024-09`
    pub year: Option<String>,
    /// Display name of the assigned team member
    pub team_member: Option<String>,
    /// School id or part of its name (school view only)
    pub school: Option<String>,
    /// Category id or part of its name (report view only)
    pub category: Option<String>,
    /// Free text matched against the group name
    pub search: Option<String>,
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Lookup tables for resolving submission references
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    schools: HashMap<Uuid, School>,
    members: HashMap<Uuid, SchoolUser>,
    reports: HashMap<Uuid, ReportWithDetails>,
}

impl ReferenceData {
    pub fn new(
        schools: Vec<School>,
        members: Vec<SchoolUser>,
        reports: Vec<ReportWithDetails>,
    ) -> Self {
        Self {
            schools: schools.into_iter().map(|s| (s.id, s)).collect(),
            members: members.into_iter().map(|m| (m.id, m)).collect(),
            reports: reports.into_iter().map(|r| (r.report.id, r)).collect(),
        }
    }

    /// `None` when the school, the report or the schedule is unknown.
    /// An unknown assignee only clears the member name.
    pub fn resolve(&self, submission: &Submission) -> Option<ResolvedSubmission> {
        let school = self.schools.get(&submission.school_id)?;
        let report = self.reports.get(&submission.report_id)?;
        let schedule = report.schedule(submission.report_schedule_id)?;

        let member_name = submission
            .assigned_member_id
            .and_then(|id| self.members.get(&id))
            .map(SchoolUser::display_name);

        Some(ResolvedSubmission {
            submission: submission.clone(),
            school_name: school.name.clone(),
            report_name: report.report.name.clone(),
            schedule_name: schedule.display_name(&report.report.name),
            member_name,
            categories: report.categories.clone(),
        })
    }
}

/// A submission with the names the dashboard shows next to it
#[derive(Debug, Clone)]
pub struct ResolvedSubmission {
    pub submission: Submission,
    pub school_name: String,
    pub report_name: String,
    /// Schedule display name, e.g. `Safety Plan (2024-09-01)`
    pub schedule_name: String,
    pub member_name: Option<String>,
    pub categories: Vec<Category>,
}

impl ResolvedSubmission {
    fn group_key(&self, view: ViewMode) -> (Uuid, &str) {
        match view {
            ViewMode::School => (self.submission.school_id, &self.school_name),
            ViewMode::Report => (self.submission.report_schedule_id, &self.schedule_name),
        }
    }

    fn matches(&self, filters: &SubmissionFilters, view: ViewMode) -> bool {
        if let Some(status) = active(&filters.status) {
            if self.submission.status.as_str() != status {
                return false;
            }
        }

        if let Some(year) = active(&filters.year) {
            if !self
                .submission
                .due_date
                .format("%Y-%m-%d")
                .to_string()
                .starts_with(year)
            {
                return false;
            }
        }

        if let Some(member) = active(&filters.team_member) {
            match &self.member_name {
                Some(name) if eq_ignore_case(name, member) => {}
                _ => return false,
            }
        }

        let (_, display) = self.group_key(view);
        if let Some(search) = active(&filters.search) {
            if !contains_ignore_case(display, search) {
                return false;
            }
        }

        match view {
            ViewMode::School => active(&filters.school).map_or(true, |school| {
                school.parse::<Uuid>().ok() == Some(self.submission.school_id)
                    || contains_ignore_case(&self.school_name, school)
            }),
            ViewMode::Report => active(&filters.category).map_or(true, |category| {
                let id = category.parse::<Uuid>().ok();
                self.categories
                    .iter()
                    .any(|c| Some(c.id) == id || contains_ignore_case(&c.name, category))
            }),
        }
    }
}

/// One bucket of the grouped view; never empty
#[derive(Debug, Clone)]
pub struct SubmissionGroup {
    /// School id or schedule id, depending on the view
    pub id: Uuid,
    pub name: String,
    /// Report categories (report view only)
    pub categories: Vec<Category>,
    pub submissions: Vec<ResolvedSubmission>,
}

impl SubmissionGroup {
    pub fn progress(&self) -> ProgressSummary {
        ProgressSummary::from_statuses(self.submissions.iter().map(|s| s.submission.status))
    }
}

#[derive(Debug, Clone)]
pub struct GroupedSubmissions {
    pub view: ViewMode,
    pub groups: Vec<SubmissionGroup>,
    /// Submissions dropped because a reference could not be resolved
    pub unresolved: usize,
}

impl GroupedSubmissions {
    /// Ids of every submission in the view, in display order
    pub fn visible_ids(&self) -> Vec<Uuid> {
        self.groups
            .iter()
            .flat_map(|g| g.submissions.iter().map(|s| s.submission.id))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.groups.iter().map(|g| g.submissions.len()).sum()
    }
}

/// Filter and bucket `submissions`. Groups keep the order in which their
/// key first appears in the input.
pub fn group_submissions(
    submissions: &[Submission],
    references: &ReferenceData,
    filters: &SubmissionFilters,
    view: ViewMode,
) -> GroupedSubmissions {
    let mut groups: Vec<SubmissionGroup> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();
    let mut unresolved = 0;

    for submission in submissions {
        let Some(resolved) = references.resolve(submission) else {
            unresolved += 1;
            continue;
        };

        if !resolved.matches(filters, view) {
            continue;
        }

        let (key, name) = resolved.group_key(view);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(SubmissionGroup {
                id: key,
                name: name.to_string(),
                categories: match view {
                    ViewMode::School => Vec::new(),
                    ViewMode::Report => resolved.categories.clone(),
                },
                submissions: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].submissions.push(resolved);
    }

    GroupedSubmissions {
        view,
        groups,
        unresolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::{Report, ReportSchedule};
    use crate::features::submissions::models::SubmissionStatus;
    use crate::features::submissions::selection::Selection;
    use crate::features::users::models::SchoolUserRole;
    use chrono::{NaiveDate, Utc};
    use fake::faker::name::en::{FirstName, LastName};
    use fake::Fake;

    struct Fixture {
        references: ReferenceData,
        submissions: Vec<Submission>,
        schools: Vec<School>,
        reports: Vec<ReportWithDetails>,
        member: SchoolUser,
    }

    fn school(name: &str) -> School {
        School {
            id: Uuid::new_v4(),
            agency_id: Uuid::nil(),
            name: name.to_string(),
            gradeserved: vec!["K".to_string()],
            address: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn category(name: &str) -> Category {
        Category {
            id: Uuid::new_v4(),
            agency_id: Uuid::nil(),
            name: name.to_string(),
            color: "#336699".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn report(
        name: &str,
        categories: Vec<Category>,
        dates: &[(i32, u32, u32)],
    ) -> ReportWithDetails {
        let id = Uuid::new_v4();
        ReportWithDetails {
            report: Report {
                id,
                agency_id: Uuid::nil(),
                name: name.to_string(),
                description: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            categories,
            schedules: dates
                .iter()
                .map(|(y, m, d)| ReportSchedule {
                    id: Uuid::new_v4(),
                    report_id: id,
                    schedule_time: NaiveDate::from_ymd_opt(*y, *m, *d).unwrap(),
                    report_name: None,
                    created_at: Utc::now(),
                })
                .collect(),
        }
    }

    fn member() -> SchoolUser {
        SchoolUser {
            id: Uuid::new_v4(),
            agency_id: Uuid::nil(),
            school_id: None,
            first_name: FirstName().fake(),
            last_name: LastName().fake(),
            email: "member@example.org".to_string(),
            role: SchoolUserRole::TeamMember,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn submission(
        school: &School,
        report: &ReportWithDetails,
        schedule: usize,
        status: SubmissionStatus,
        assigned: Option<Uuid>,
    ) -> Submission {
        let schedule = &report.schedules[schedule];
        Submission {
            id: Uuid::new_v4(),
            agency_id: Uuid::nil(),
            report_id: report.report.id,
            report_schedule_id: schedule.id,
            school_id: school.id,
            assigned_member_id: assigned,
            status,
            due_date: schedule.schedule_time,
            school_submission_date: None,
            file_urls: Vec::new(),
            note: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Three schools, two reports (two schedules each), one team member
    fn fixture() -> Fixture {
        use SubmissionStatus::*;

        let lincoln = school("Lincoln Elementary");
        let roosevelt = school("Roosevelt Middle");
        let third = school("Washington High");

        let safety = report(
            "Safety Plan",
            vec![category("Health & Safety")],
            &[(2024, 9, 1), (2025, 1, 15)],
        );
        let budget = report(
            "Budget Review",
            vec![category("Finance"), category("Governance")],
            &[(2024, 10, 1), (2025, 3, 1)],
        );
        let member = member();

        let submissions = vec![
            submission(&roosevelt, &safety, 0, Completed, Some(member.id)),
            submission(&lincoln, &budget, 0, Pending, None),
            submission(&lincoln, &safety, 0, Incompleted, Some(member.id)),
            submission(&third, &budget, 1, Completed, None),
            submission(&roosevelt, &budget, 0, Returned, None),
            submission(&lincoln, &safety, 1, Completed, Some(member.id)),
        ];

        let schools = vec![lincoln, roosevelt, third];
        let reports = vec![safety, budget];
        Fixture {
            references: ReferenceData::new(schools.clone(), vec![member.clone()], reports.clone()),
            submissions,
            schools,
            reports,
            member,
        }
    }

    fn group(f: &Fixture, filters: &SubmissionFilters, view: ViewMode) -> GroupedSubmissions {
        group_submissions(&f.submissions, &f.references, filters, view)
    }

    fn filters() -> SubmissionFilters {
        SubmissionFilters::default()
    }

    #[test]
    fn test_both_views_partition_the_same_submissions() {
        let f = fixture();
        let by_school = group(&f, &filters(), ViewMode::School);
        let by_report = group(&f, &filters(), ViewMode::Report);

        assert_eq!(by_school.total(), f.submissions.len());
        assert_eq!(by_report.total(), f.submissions.len());
        assert_eq!(by_school.groups.len(), 3);
        assert_eq!(by_report.groups.len(), 4);

        let mut a = by_school.visible_ids();
        let mut b = by_report.visible_ids();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn test_groups_keep_first_seen_order() {
        let f = fixture();
        let by_school = group(&f, &filters(), ViewMode::School);
        let names: Vec<&str> = by_school.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names[0], "Roosevelt Middle");
        assert_eq!(names[1], "Lincoln Elementary");
        assert_eq!(by_school.groups[2].id, f.schools[2].id);

        let by_report = group(&f, &filters(), ViewMode::Report);
        assert_eq!(by_report.groups[0].name, "Safety Plan (2024-09-01)");
        assert_eq!(by_report.groups[1].name, "Budget Review (2024-10-01)");
        assert_eq!(by_report.groups[1].categories.len(), 2);
        assert!(by_school.groups[0].categories.is_empty());
    }

    #[test]
    fn test_status_filter_is_exact() {
        let f = fixture();
        let grouped = group(
            &f,
            &SubmissionFilters {
                status: Some("completed".to_string()),
                ..filters()
            },
            ViewMode::School,
        );
        assert_eq!(grouped.total(), 3);
        assert!(grouped
            .groups
            .iter()
            .flat_map(|g| &g.submissions)
            .all(|s| s.submission.status == SubmissionStatus::Completed));
        assert!(grouped.groups.iter().all(|g| !g.submissions.is_empty()));

        let none = group(
            &f,
            &SubmissionFilters {
                status: Some("Completed".to_string()),
                ..filters()
            },
            ViewMode::School,
        );
        assert_eq!(none.total(), 0);
        assert!(none.groups.is_empty());
    }

    #[test]
    fn test_year_matches_due_date_prefix() {
        let f = fixture();
        let in_2025 = group(
            &f,
            &SubmissionFilters {
                year: Some("2025".to_string()),
                ..filters()
            },
            ViewMode::Report,
        );
        assert_eq!(in_2025.total(), 2);
        assert!(in_2025.visible_ids().iter().all(|id| f
            .submissions
            .iter()
            .any(|s| s.id == *id && s.due_date.format("%Y").to_string() == "2025")));

        let september = group(
            &f,
            &SubmissionFilters {
                year: Some("2024-09".to_string()),
                ..filters()
            },
            ViewMode::Report,
        );
        assert_eq!(september.total(), 2);
    }

    #[test]
    fn test_team_member_filter_ignores_case_and_skips_unassigned() {
        let f = fixture();
        let name = f.member.display_name().to_uppercase();
        let grouped = group(
            &f,
            &SubmissionFilters {
                team_member: Some(name),
                ..filters()
            },
            ViewMode::School,
        );
        assert_eq!(grouped.total(), 3);
        assert!(grouped
            .groups
            .iter()
            .flat_map(|g| &g.submissions)
            .all(|s| s.submission.assigned_member_id == Some(f.member.id)));
    }

    #[test]
    fn test_team_member_filter_folds_non_ascii_names() {
        let mut f = fixture();
        f.member.first_name = "Élodie".to_string();
        f.member.last_name = "Müller".to_string();
        f.references =
            ReferenceData::new(f.schools.clone(), vec![f.member.clone()], f.reports.clone());

        let grouped = group(
            &f,
            &SubmissionFilters {
                team_member: Some("élodie müller".to_string()),
                ..filters()
            },
            ViewMode::Report,
        );
        assert_eq!(grouped.total(), 3);
    }

    #[test]
    fn test_school_filter_applies_only_in_school_view() {
        let f = fixture();
        let by_name = SubmissionFilters {
            school: Some("lincoln".to_string()),
            ..filters()
        };
        let grouped = group(&f, &by_name, ViewMode::School);
        assert_eq!(grouped.groups.len(), 1);
        assert_eq!(grouped.total(), 3);

        let by_id = SubmissionFilters {
            school: Some(f.schools[1].id.to_string()),
            ..filters()
        };
        assert_eq!(group(&f, &by_id, ViewMode::School).total(), 2);

        assert_eq!(group(&f, &by_name, ViewMode::Report).total(), 6);
    }

    #[test]
    fn test_category_filter_applies_only_in_report_view() {
        let f = fixture();
        let by_name = SubmissionFilters {
            category: Some("finance".to_string()),
            ..filters()
        };
        let grouped = group(&f, &by_name, ViewMode::Report);
        assert_eq!(grouped.total(), 3);
        assert!(grouped
            .groups
            .iter()
            .all(|g| g.name.starts_with("Budget Review")));

        let by_id = SubmissionFilters {
            category: Some(f.reports[0].categories[0].id.to_string()),
            ..filters()
        };
        assert_eq!(group(&f, &by_id, ViewMode::Report).total(), 3);

        assert_eq!(group(&f, &by_name, ViewMode::School).total(), 6);
    }

    #[test]
    fn test_search_matches_group_name() {
        let f = fixture();
        let search = SubmissionFilters {
            search: Some("ROOSE".to_string()),
            ..filters()
        };
        assert_eq!(group(&f, &search, ViewMode::School).total(), 2);

        let search = SubmissionFilters {
            search: Some("(2025-01".to_string()),
            ..filters()
        };
        let grouped = group(&f, &search, ViewMode::Report);
        assert_eq!(grouped.groups.len(), 1);
        assert_eq!(grouped.groups[0].name, "Safety Plan (2025-01-15)");
    }

    #[test]
    fn test_blank_filters_are_ignored() {
        let f = fixture();
        let blank = SubmissionFilters {
            status: Some(String::new()),
            year: Some("  ".to_string()),
            team_member: Some(String::new()),
            school: Some(String::new()),
            category: Some(String::new()),
            search: Some(String::new()),
        };
        assert_eq!(group(&f, &blank, ViewMode::School).total(), 6);
        assert_eq!(group(&f, &blank, ViewMode::Report).total(), 6);
    }

    #[test]
    fn test_unresolvable_submissions_are_counted() {
        let mut f = fixture();
        let stray_school = school("Closed School");
        f.submissions
            .push(submission(&stray_school, &f.reports[0], 0, SubmissionStatus::Pending, None));

        let mut wrong_schedule =
            submission(&f.schools[0], &f.reports[0], 0, SubmissionStatus::Pending, None);
        wrong_schedule.report_schedule_id = f.reports[1].schedules[0].id;
        f.submissions.push(wrong_schedule);

        let unknown_member = submission(
            &f.schools[0],
            &f.reports[0],
            1,
            SubmissionStatus::Pending,
            Some(Uuid::new_v4()),
        );
        f.submissions.push(unknown_member);

        for view in [ViewMode::School, ViewMode::Report] {
            let grouped = group(&f, &filters(), view);
            assert_eq!(grouped.unresolved, 2);
            assert_eq!(grouped.total(), 7);
        }
    }

    #[test]
    fn test_select_all_takes_exactly_the_visible_ids() {
        let f = fixture();
        let grouped = group(
            &f,
            &SubmissionFilters {
                status: Some("completed".to_string()),
                ..filters()
            },
            ViewMode::Report,
        );
        let visible = grouped.visible_ids();

        let mut selection = Selection::default();
        selection.toggle(f.submissions[1].id);
        selection.toggle_all(&visible);

        assert_eq!(selection.ids(), visible.as_slice());
    }

    #[test]
    fn test_group_progress_counts_members() {
        let f = fixture();
        let grouped = group(&f, &filters(), ViewMode::School);
        let lincoln = grouped
            .groups
            .iter()
            .find(|g| g.name == "Lincoln Elementary")
            .unwrap();
        let progress = lincoln.progress();
        assert_eq!(progress.total, 3);
        assert_eq!(progress.segments.len(), 3);
    }
}
