// Plain CRUD records owned by the backend. The client only shapes and
// validates request bodies before sending them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};
use crate::models::{lenient, Role};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffRecord {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub department: Option<String>,
    pub role: Role,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffInput {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub role: Role,
    // Omitted on update unless a new password is being set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl StaffInput {
    pub fn validate(&self) -> ClientResult<()> {
        if self.name.trim().is_empty() {
            return Err(ClientError::validation("name", "is required"));
        }
        if !self.email.contains('@') {
            return Err(ClientError::validation("email", "must be an email address"));
        }
        if !self.role.is_known() {
            return Err(ClientError::validation(
                "role",
                format!("'{}' is not SuperAdmin, Admin or Staff", self.role),
            ));
        }
        if matches!(self.password.as_deref(), Some(p) if p.trim().is_empty()) {
            return Err(ClientError::validation("password", "must not be blank"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub topic_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "file_path")]
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicInput {
    pub title: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub category: Option<String>,
    pub file_path: Option<String>,
}

impl TopicInput {
    pub fn validate(&self) -> ClientResult<()> {
        if self.title.trim().is_empty() {
            return Err(ClientError::validation("title", "is required"));
        }
        if let Some(link) = self.link.as_deref().filter(|l| !l.is_empty()) {
            url::Url::parse(link)
                .map_err(|e| ClientError::validation("link", e.to_string()))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tip {
    pub tip_id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TipInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl TipInput {
    pub fn validate(&self) -> ClientResult<()> {
        if self.description.trim().is_empty() {
            return Err(ClientError::validation("description", "is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Training {
    pub training_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingInput {
    pub title: String,
    pub description: String,
}

impl TrainingInput {
    pub fn validate(&self) -> ClientResult<()> {
        if self.title.trim().is_empty() {
            return Err(ClientError::validation("title", "is required"));
        }
        if self.description.trim().is_empty() {
            return Err(ClientError::validation("description", "is required"));
        }
        Ok(())
    }
}

/// A training assigned to a staff member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingAssignment {
    #[serde(alias = "sessionId", alias = "assignmentId")]
    pub id: i64,
    pub training_id: i64,
    pub user_id: i64,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentInput {
    pub training_id: i64,
    pub user_id: i64,
}

impl AssignmentInput {
    pub fn validate(&self) -> ClientResult<()> {
        if self.training_id <= 0 {
            return Err(ClientError::validation("trainingId", "is required"));
        }
        if self.user_id <= 0 {
            return Err(ClientError::validation("userId", "is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub policy_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub uploaded_by: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub download_count: i64,
}

/// Editable policy metadata; the document itself is not replaced. Sent as
/// form fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PolicyInput {
    pub fn validate(&self) -> ClientResult<()> {
        if self.title.trim().is_empty() {
            return Err(ClientError::validation("title", "is required"));
        }
        Ok(())
    }
}
