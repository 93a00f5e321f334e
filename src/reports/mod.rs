// Secondary statistics over server-computed reports.
//
// Every function here is total: empty input and missing numbers (already
// read as 0 by the wire model) produce defined results.

pub mod dashboard;
pub mod filter;

use serde::Serialize;
use std::collections::BTreeSet;

use crate::models::Report;

pub use dashboard::{chart_series, staff_progress, ChartPoint, DepartmentOverview, SuperAdminOverview};
pub use filter::ReportFilter;

/// Arithmetic mean of `awareness_score`; 0 for no reports
pub fn average_score(reports: &[Report]) -> f64 {
    if reports.is_empty() {
        return 0.0;
    }
    let sum: f64 = reports.iter().map(|r| finite_or_zero(r.awareness_score)).sum();
    sum / reports.len() as f64
}

pub fn total_attempts(reports: &[Report]) -> i64 {
    reports
        .iter()
        .fold(0i64, |total, r| total.saturating_add(r.total_attempts))
}

/// Users that have at least one report
pub fn active_user_ids(reports: &[Report]) -> BTreeSet<i64> {
    reports.iter().map(|r| r.user_id).collect()
}

/// First `n` reports in the order the server returned them. No sorting
/// happens here; see `latest_n_by_created` when recency matters.
pub fn latest_n(reports: &[Report], n: usize) -> &[Report] {
    &reports[..n.min(reports.len())]
}

/// The `n` most recent reports by `created_at`, newest first. Reports
/// without a timestamp sort last; ties keep server order.
pub fn latest_n_by_created(reports: &[Report], n: usize) -> Vec<Report> {
    let mut sorted = reports.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(n);
    sorted
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    Low,
    Mid,
    High,
}

impl ScoreTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreTier::Low => "low",
            ScoreTier::Mid => "mid",
            ScoreTier::High => "high",
        }
    }
}

/// Colour band for a score: low below 40, mid 40 to 69, high from 70
pub fn score_tier(score: f64) -> ScoreTier {
    let score = finite_or_zero(score);
    if score >= 70.0 {
        ScoreTier::High
    } else if score >= 40.0 {
        ScoreTier::Mid
    } else {
        ScoreTier::Low
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lenient::parse_timestamp;

    fn report(id: i64, user_id: i64, score: f64, attempts: i64, created: Option<&str>) -> Report {
        Report {
            report_id: id,
            user_id,
            total_attempts: attempts,
            correct_count: 0,
            awareness_score: score,
            created_at: created.and_then(parse_timestamp),
            user: None,
        }
    }

    #[test]
    fn average_of_nothing_is_zero() {
        assert_eq!(average_score(&[]), 0.0);
    }

    #[test]
    fn average_is_arithmetic_mean() {
        let reports = [report(1, 1, 80.0, 1, None), report(2, 2, 40.0, 1, None)];
        assert_eq!(average_score(&reports), 60.0);
    }

    #[test]
    fn non_finite_scores_count_as_zero() {
        let reports = [report(1, 1, f64::NAN, 1, None), report(2, 2, 50.0, 1, None)];
        assert_eq!(average_score(&reports), 25.0);
    }

    #[test]
    fn attempts_and_active_users() {
        let reports = [
            report(1, 4, 10.0, 3, None),
            report(2, 4, 20.0, 2, None),
            report(3, 9, 30.0, 0, None),
        ];
        assert_eq!(total_attempts(&reports), 5);
        assert_eq!(active_user_ids(&reports).into_iter().collect::<Vec<_>>(), vec![4, 9]);
        assert_eq!(total_attempts(&[]), 0);
    }

    #[test]
    fn attempt_total_saturates() {
        let reports = [report(1, 1, 0.0, i64::MAX, None), report(2, 2, 0.0, 5, None)];
        assert_eq!(total_attempts(&reports), i64::MAX);
    }

    #[test]
    fn tiers_have_inclusive_lower_bounds() {
        assert_eq!(score_tier(39.0), ScoreTier::Low);
        assert_eq!(score_tier(39.9), ScoreTier::Low);
        assert_eq!(score_tier(40.0), ScoreTier::Mid);
        assert_eq!(score_tier(69.0), ScoreTier::Mid);
        assert_eq!(score_tier(70.0), ScoreTier::High);
        assert_eq!(score_tier(100.0), ScoreTier::High);
        assert_eq!(score_tier(f64::NAN), ScoreTier::Low);
    }

    #[test]
    fn latest_n_keeps_server_order() {
        let reports = [
            report(1, 1, 0.0, 0, Some("2025-01-01T00:00:00")),
            report(2, 1, 0.0, 0, Some("2025-03-01T00:00:00")),
            report(3, 1, 0.0, 0, Some("2025-02-01T00:00:00")),
        ];
        let ids: Vec<_> = latest_n(&reports, 2).iter().map(|r| r.report_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(latest_n(&reports, 10).len(), 3);
        assert!(latest_n(&[], 5).is_empty());
    }

    #[test]
    fn latest_by_created_sorts_newest_first() {
        let reports = [
            report(1, 1, 0.0, 0, Some("2025-01-01T00:00:00")),
            report(2, 1, 0.0, 0, None),
            report(3, 1, 0.0, 0, Some("2025-03-01T00:00:00")),
            report(4, 1, 0.0, 0, Some("2025-02-01T00:00:00")),
        ];
        let ids: Vec<_> = latest_n_by_created(&reports, 4)
            .iter()
            .map(|r| r.report_id)
            .collect();
        assert_eq!(ids, vec![3, 4, 1, 2]);
    }
}
