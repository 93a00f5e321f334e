use chrono::{NaiveDate, NaiveTime};
use std::collections::HashMap;

use crate::models::{Report, StaffRecord};

/// Reports-page filter. Empty criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    /// Case-insensitive substring of the user's name or email
    pub search: Option<String>,
    /// Exact department name
    pub department: Option<String>,
    /// Inclusive, compared in UTC
    pub date_from: Option<NaiveDate>,
    /// Inclusive through the end of the day
    pub date_to: Option<NaiveDate>,
}

struct Owner<'a> {
    name: Option<&'a str>,
    email: Option<&'a str>,
    department: Option<&'a str>,
}

impl ReportFilter {
    pub fn is_empty(&self) -> bool {
        self.search().is_none()
            && self.department().is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }

    /// Reports matching every criterion, in input order. User details come
    /// from the report's embedded user, else from `staff` by user id.
    pub fn apply(&self, reports: &[Report], staff: &[StaffRecord]) -> Vec<Report> {
        let directory: HashMap<i64, &StaffRecord> = staff.iter().map(|s| (s.user_id, s)).collect();
        reports
            .iter()
            .filter(|r| self.matches(r, directory.get(&r.user_id).copied()))
            .cloned()
            .collect()
    }

    fn matches(&self, report: &Report, staff: Option<&StaffRecord>) -> bool {
        let owner = Owner {
            name: report.user_name().or(staff.map(|s| s.name.as_str())),
            email: report.user_email().or(staff.map(|s| s.email.as_str())),
            department: report
                .user_department()
                .or(staff.and_then(|s| s.department.as_deref())),
        };

        if let Some(needle) = self.search() {
            let needle = needle.to_lowercase();
            let hit = [owner.name, owner.email]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(department) = self.department() {
            if owner.department != Some(department) {
                return false;
            }
        }

        if self.date_from.is_some() || self.date_to.is_some() {
            let Some(created) = report.created_at.map(|c| c.naive_utc()) else {
                return false;
            };
            if let Some(from) = self.date_from {
                if created < from.and_time(NaiveTime::MIN) {
                    return false;
                }
            }
            if let Some(to) = self.date_to {
                if created.date() > to {
                    return false;
                }
            }
        }

        true
    }

    fn search(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    fn department(&self) -> Option<&str> {
        self.department.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lenient::parse_timestamp;
    use crate::models::{ReportUser, Role};

    fn report(id: i64, user_id: i64, created: &str, user: Option<ReportUser>) -> Report {
        Report {
            report_id: id,
            user_id,
            created_at: parse_timestamp(created),
            user,
            ..Default::default()
        }
    }

    fn staff(user_id: i64, name: &str, email: &str, department: &str) -> StaffRecord {
        StaffRecord {
            user_id,
            name: name.into(),
            email: email.into(),
            department: Some(department.into()),
            role: Role::Staff,
            created_at: None,
        }
    }

    fn ids(reports: &[Report]) -> Vec<i64> {
        reports.iter().map(|r| r.report_id).collect()
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let reports = vec![report(1, 1, "", None), report(2, 2, "2025-01-01T00:00:00", None)];
        let filter = ReportFilter {
            search: Some("  ".into()),
            ..Default::default()
        };
        assert!(filter.is_empty());
        assert_eq!(ids(&filter.apply(&reports, &[])), vec![1, 2]);
    }

    #[test]
    fn search_uses_embedded_user_then_staff_directory() {
        let reports = vec![
            report(
                1,
                1,
                "",
                Some(ReportUser {
                    name: Some("Alice Mbeki".into()),
                    email: None,
                    department: Some("IT".into()),
                }),
            ),
            report(2, 2, "", None),
            report(3, 3, "", None),
        ];
        let directory = [
            staff(2, "Bob", "bob@finance.example.org", "Finance"),
            staff(3, "Carol", "carol@hr.example.org", "HR"),
        ];

        let by_name = ReportFilter {
            search: Some("alice".into()),
            ..Default::default()
        };
        assert_eq!(ids(&by_name.apply(&reports, &directory)), vec![1]);

        let by_email = ReportFilter {
            search: Some("FINANCE.example".into()),
            ..Default::default()
        };
        assert_eq!(ids(&by_email.apply(&reports, &directory)), vec![2]);

        let by_department = ReportFilter {
            department: Some("HR".into()),
            ..Default::default()
        };
        assert_eq!(ids(&by_department.apply(&reports, &directory)), vec![3]);
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let reports = vec![
            report(1, 1, "2025-01-31T23:59:00", None),
            report(2, 1, "2025-02-01T00:00:00", None),
            report(3, 1, "2025-02-28T18:00:00", None),
            report(4, 1, "2025-03-01T00:00:00", None),
            report(5, 1, "", None),
        ];
        let february = ReportFilter {
            date_from: NaiveDate::from_ymd_opt(2025, 2, 1),
            date_to: NaiveDate::from_ymd_opt(2025, 2, 28),
            ..Default::default()
        };
        assert_eq!(ids(&february.apply(&reports, &[])), vec![2, 3]);
    }
}
