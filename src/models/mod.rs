// Wire records exchanged with the awareness platform API

pub mod identity;
pub mod quiz;
pub mod records;
pub mod report;

pub use identity::{Identity, LoginRequest, LoginResponse, Role, UserProfile};
pub use quiz::{Attempt, AttemptRecord, OptionLabel, Quiz, QuizInput};
pub use records::{
    AssignmentInput, Policy, PolicyInput, StaffInput, StaffRecord, Tip, TipInput, Topic, TopicInput, Training,
    TrainingAssignment, TrainingInput,
};
pub use report::{Report, ReportUser};

/// Serde helpers for the loosely-typed backend payloads
pub(crate) mod lenient {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    /// `null` or a missing field becomes `T::default()`
    pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// Accepts RFC 3339 timestamps as well as the naive ISO form the
    /// backend emits for server-side `now()` defaults (read as UTC).
    pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_timestamp))
    }

    pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

}
