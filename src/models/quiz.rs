use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{ClientError, ClientResult};
use crate::models::lenient;

/// One of the four answer slots every quiz carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; 4] = [OptionLabel::A, OptionLabel::B, OptionLabel::C, OptionLabel::D];

    pub fn parse(raw: &str) -> ClientResult<Self> {
        match raw.trim().to_uppercase().as_str() {
            "A" => Ok(OptionLabel::A),
            "B" => Ok(OptionLabel::B),
            "C" => Ok(OptionLabel::C),
            "D" => Ok(OptionLabel::D),
            _ => Err(ClientError::validation(
                "answer",
                format!("'{}' is not one of A, B, C, D", raw.trim()),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionLabel::A => "A",
            OptionLabel::B => "B",
            OptionLabel::C => "C",
            OptionLabel::D => "D",
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OptionLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OptionLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        OptionLabel::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub quiz_id: i64,
    pub question: String,
    #[serde(rename = "optionA")]
    pub option_a: String,
    #[serde(rename = "optionB")]
    pub option_b: String,
    #[serde(rename = "optionC")]
    pub option_c: String,
    #[serde(rename = "optionD")]
    pub option_d: String,
    // Left as a string: staff-facing payloads may blank it out
    #[serde(default)]
    pub correct_answer: String,
    pub topic_id: i64,
}

impl Quiz {
    pub fn option(&self, label: OptionLabel) -> &str {
        match label {
            OptionLabel::A => &self.option_a,
            OptionLabel::B => &self.option_b,
            OptionLabel::C => &self.option_c,
            OptionLabel::D => &self.option_d,
        }
    }

    pub fn options(&self) -> impl Iterator<Item = (OptionLabel, &str)> {
        OptionLabel::ALL.into_iter().map(move |label| (label, self.option(label)))
    }
}

/// Body for creating or replacing a quiz
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizInput {
    pub question: String,
    #[serde(rename = "optionA")]
    pub option_a: String,
    #[serde(rename = "optionB")]
    pub option_b: String,
    #[serde(rename = "optionC")]
    pub option_c: String,
    #[serde(rename = "optionD")]
    pub option_d: String,
    pub correct_answer: OptionLabel,
    pub topic_id: i64,
}

impl QuizInput {
    pub fn validate(&self) -> ClientResult<()> {
        if self.question.trim().is_empty() {
            return Err(ClientError::validation("question", "is required"));
        }
        let options = [
            ("optionA", &self.option_a),
            ("optionB", &self.option_b),
            ("optionC", &self.option_c),
            ("optionD", &self.option_d),
        ];
        for (field, value) in options {
            if value.trim().is_empty() {
                return Err(ClientError::validation(field, "is required"));
            }
        }
        if self.topic_id <= 0 {
            return Err(ClientError::validation("topicId", "must reference a topic"));
        }
        Ok(())
    }
}

/// One recorded answer for a user and quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub user_id: i64,
    pub quiz_id: i64,
    pub selected_answer: OptionLabel,
}

/// Backend acknowledgement of a recorded attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub attempt_id: i64,
    pub user_id: i64,
    pub quiz_id: i64,
    pub selected_answer: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub is_correct: i64,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn option_labels_parse_case_insensitively() {
        assert_eq!(OptionLabel::parse("b").unwrap(), OptionLabel::B);
        assert_eq!(OptionLabel::parse(" D ").unwrap(), OptionLabel::D);
        let err = OptionLabel::parse("E").unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILURE");
    }

    #[test]
    fn quiz_exposes_options_in_label_order() {
        let quiz: Quiz = serde_json::from_value(json!({
            "quizId": 3,
            "question": "What is phishing?",
            "optionA": "A fish",
            "optionB": "A social engineering attack",
            "optionC": "A firewall",
            "optionD": "A password",
            "correctAnswer": "B",
            "topicId": 1
        }))
        .unwrap();

        let labels: Vec<_> = quiz.options().map(|(label, _)| label).collect();
        assert_eq!(labels, OptionLabel::ALL.to_vec());
        assert_eq!(quiz.option(OptionLabel::B), "A social engineering attack");
    }

    #[test]
    fn attempt_serializes_with_wire_names() {
        let attempt = Attempt {
            user_id: 4,
            quiz_id: 9,
            selected_answer: OptionLabel::C,
        };
        assert_eq!(
            serde_json::to_value(&attempt).unwrap(),
            json!({"userId": 4, "quizId": 9, "selectedAnswer": "C"})
        );
    }

    #[test]
    fn quiz_input_requires_every_option() {
        let mut input = QuizInput {
            question: "Q?".into(),
            option_a: "a".into(),
            option_b: "b".into(),
            option_c: " ".into(),
            option_d: "d".into(),
            correct_answer: OptionLabel::A,
            topic_id: 1,
        };
        match input.validate() {
            Err(ClientError::Validation { field, .. }) => assert_eq!(field, "optionC"),
            other => panic!("unexpected: {other:?}"),
        }

        input.option_c = "c".into();
        assert!(input.validate().is_ok());
    }
}
