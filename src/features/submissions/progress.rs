//! Per-status progress bar for a group of submissions.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::submissions::models::SubmissionStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProgressSegment {
    pub status: SubmissionStatus,
    pub count: usize,
    /// Share of the group, floored to two decimals
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProgressSummary {
    pub total: usize,
    pub segments: Vec<ProgressSegment>,
}

impl ProgressSummary {
    /// Segments follow [`SubmissionStatus::ORDERED`]; empty statuses are left out.
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = SubmissionStatus>,
    {
        let mut counts = [0usize; 4];
        for status in statuses {
            counts[slot(status)] += 1;
        }
        let total: usize = counts.iter().sum();

        let segments = SubmissionStatus::ORDERED
            .into_iter()
            .zip(counts)
            .filter(|(_, count)| *count > 0)
            .map(|(status, count)| ProgressSegment {
                status,
                count,
                percent: floor_percent(count, total),
            })
            .collect();

        Self { total, segments }
    }
}

fn slot(status: SubmissionStatus) -> usize {
    match status {
        SubmissionStatus::Incompleted => 0,
        SubmissionStatus::Pending => 1,
        SubmissionStatus::Returned => 2,
        SubmissionStatus::Completed => 3,
    }
}

/// Integer basis points keep the floored shares from summing past 100
fn floor_percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let basis_points = (count as u64 * 10_000) / total as u64;
    basis_points as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use SubmissionStatus::*;

    #[test]
    fn test_segments_follow_fixed_order_and_skip_zero() {
        let summary = ProgressSummary::from_statuses([Completed, Incompleted, Completed]);
        let statuses: Vec<_> = summary.segments.iter().map(|s| s.status).collect();
        assert_eq!(statuses, vec![Incompleted, Completed]);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.segments[1].count, 2);
    }

    #[test]
    fn test_thirds_are_floored() {
        let summary = ProgressSummary::from_statuses([Incompleted, Pending, Returned]);
        for segment in &summary.segments {
            assert_eq!(segment.percent, 33.33);
        }
        let sum: f64 = summary.segments.iter().map(|s| s.percent).sum();
        assert!(sum <= 100.0);
    }

    #[test]
    fn test_percentages_never_exceed_hundred() {
        let cases: &[&[SubmissionStatus]] = &[
            &[Incompleted; 7],
            &[Incompleted, Pending, Pending, Returned, Completed, Completed, Completed],
            &[Pending, Returned, Returned, Completed, Completed, Completed, Completed, Completed, Completed],
        ];
        for statuses in cases {
            let summary = ProgressSummary::from_statuses(statuses.iter().copied());
            let sum: f64 = summary.segments.iter().map(|s| s.percent).sum();
            assert!(sum <= 100.0 + f64::EPSILON, "sum {} for {:?}", sum, statuses);
            assert!(summary.segments.iter().all(|s| s.count > 0));
        }
    }

    #[test]
    fn test_single_status_is_full_bar() {
        let summary = ProgressSummary::from_statuses([Completed, Completed]);
        assert_eq!(summary.segments.len(), 1);
        assert_eq!(summary.segments[0].percent, 100.0);
    }

    #[test]
    fn test_empty_group() {
        let summary = ProgressSummary::from_statuses(std::iter::empty());
        assert_eq!(summary.total, 0);
        assert!(summary.segments.is_empty());
    }
}
