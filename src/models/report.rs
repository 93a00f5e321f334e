use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::lenient;

/// Server-computed awareness summary for one user. Read-only on the client;
/// `awareness_score` is never recomputed here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub report_id: i64,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub user_id: i64,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub total_attempts: i64,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub correct_count: i64,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub awareness_score: f64,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// Some deployments embed the owning user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ReportUser>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

impl Report {
    pub fn user_name(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.name.as_deref())
    }

    pub fn user_email(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.email.as_deref())
    }

    pub fn user_department(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.department.as_deref())
    }
}
