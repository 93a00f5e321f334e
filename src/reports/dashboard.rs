// Per-role dashboard summaries

use serde::Serialize;
use std::collections::BTreeSet;

use crate::models::{Report, StaffRecord};
use crate::reports::{active_user_ids, average_score, latest_n, score_tier, total_attempts, ScoreTier};

/// How many reports the admin dashboard lists
pub const DASHBOARD_LATEST: usize = 5;

/// System-wide counts for the SuperAdmin landing page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuperAdminOverview {
    pub users: usize,
    pub departments: usize,
    pub topics: usize,
    pub reports: usize,
    pub attempts: i64,
    pub average_score: f64,
}

impl SuperAdminOverview {
    pub fn build(staff: &[StaffRecord], topic_count: usize, reports: &[Report]) -> Self {
        let departments: BTreeSet<&str> = staff
            .iter()
            .filter_map(|s| s.department.as_deref())
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .collect();

        Self {
            users: staff.len(),
            departments: departments.len(),
            topics: topic_count,
            reports: reports.len(),
            attempts: total_attempts(reports),
            average_score: average_score(reports),
        }
    }
}

/// Department view for an Admin; the backend already scopes both lists
/// to the admin's department.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentOverview {
    pub staff_count: usize,
    pub total_attempts: i64,
    pub average_score: f64,
    pub average_tier: ScoreTier,
    pub active_user_ids: BTreeSet<i64>,
    pub latest: Vec<Report>,
}

impl DepartmentOverview {
    pub fn build(staff: &[StaffRecord], reports: &[Report]) -> Self {
        let average = average_score(reports);
        Self {
            staff_count: staff.len(),
            total_attempts: total_attempts(reports),
            average_score: average,
            average_tier: score_tier(average),
            active_user_ids: active_user_ids(reports),
            // Server order, as the dashboard has always shown it
            latest: latest_n(reports, DASHBOARD_LATEST).to_vec(),
        }
    }

    /// Whether a staff member has taken part in any quiz
    pub fn is_active(&self, user_id: i64) -> bool {
        self.active_user_ids.contains(&user_id)
    }

    pub fn active_staff(&self, staff: &[StaffRecord]) -> usize {
        staff.iter().filter(|s| self.is_active(s.user_id)).count()
    }
}

/// Staff learning progress shown on their dashboard: ten points per
/// report, capped at 100.
pub fn staff_progress(reports: &[Report]) -> u32 {
    (reports.len().saturating_mul(10)).min(100) as u32
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub score: f64,
    pub correct: i64,
}

/// Bar-chart series: one point per report
pub fn chart_series(reports: &[Report]) -> Vec<ChartPoint> {
    reports
        .iter()
        .map(|r| ChartPoint {
            label: r.user_name().unwrap_or("Unknown User").to_string(),
            score: if r.awareness_score.is_finite() { r.awareness_score } else { 0.0 },
            correct: r.correct_count,
        })
        .collect()
}
