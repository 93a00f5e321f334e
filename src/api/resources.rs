// Typed calls for each backend resource

use reqwest::Method;
use serde_json::Value;
use tracing::info;

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::models::{
    AssignmentInput, Attempt, AttemptRecord, Policy, PolicyInput, Quiz, QuizInput, Report, StaffInput,
    StaffRecord, Tip, TipInput, Topic, TopicInput, Training, TrainingAssignment, TrainingInput,
};

impl ApiClient {
    // ---- staff ----

    pub async fn list_staff(&self) -> ClientResult<Vec<StaffRecord>> {
        self.get_json("staff").await
    }

    pub async fn create_staff(&self, input: &StaffInput) -> ClientResult<StaffRecord> {
        input.validate()?;
        self.send_json(Method::POST, "staff", input).await
    }

    pub async fn update_staff(&self, user_id: i64, input: &StaffInput) -> ClientResult<StaffRecord> {
        input.validate()?;
        self.send_json(Method::PUT, &format!("staff/{user_id}"), input).await
    }

    pub async fn delete_staff(&self, user_id: i64) -> ClientResult<()> {
        self.delete(&format!("staff/{user_id}")).await
    }

    // ---- topics ----

    pub async fn list_topics(&self) -> ClientResult<Vec<Topic>> {
        self.get_json("topics").await
    }

    pub async fn get_topic(&self, topic_id: i64) -> ClientResult<Topic> {
        self.get_json(&format!("topics/{topic_id}")).await
    }

    pub async fn create_topic(&self, input: &TopicInput) -> ClientResult<Topic> {
        input.validate()?;
        self.send_json(Method::POST, "topics", input).await
    }

    pub async fn update_topic(&self, topic_id: i64, input: &TopicInput) -> ClientResult<Topic> {
        input.validate()?;
        self.send_json(Method::PUT, &format!("topics/{topic_id}"), input).await
    }

    pub async fn delete_topic(&self, topic_id: i64) -> ClientResult<()> {
        self.delete(&format!("topics/{topic_id}")).await
    }

    // ---- quizzes ----

    /// Quizzes in server order, optionally narrowed to one topic
    pub async fn list_quizzes(&self, topic_id: Option<i64>) -> ClientResult<Vec<Quiz>> {
        match topic_id {
            Some(id) => self.get_json_query("quizzes", &[("topicId", id)]).await,
            None => self.get_json("quizzes").await,
        }
    }

    pub async fn create_quiz(&self, input: &QuizInput) -> ClientResult<Quiz> {
        input.validate()?;
        self.send_json(Method::POST, "quizzes", input).await
    }

    pub async fn update_quiz(&self, quiz_id: i64, input: &QuizInput) -> ClientResult<Quiz> {
        input.validate()?;
        self.send_json(Method::PUT, &format!("quizzes/{quiz_id}"), input).await
    }

    pub async fn delete_quiz(&self, quiz_id: i64) -> ClientResult<()> {
        self.delete(&format!("quizzes/{quiz_id}")).await
    }

    // ---- attempts & reports ----

    pub async fn record_attempt(&self, attempt: &Attempt) -> ClientResult<AttemptRecord> {
        let record: AttemptRecord = self.send_json(Method::POST, "attempts", attempt).await?;
        info!(
            quiz_id = attempt.quiz_id,
            attempt_id = record.attempt_id,
            "attempt recorded"
        );
        Ok(record)
    }

    /// Reports visible to the caller; the backend scopes them by role
    pub async fn list_reports(&self) -> ClientResult<Vec<Report>> {
        self.get_json("reports").await
    }

    // ---- awareness tips ----

    pub async fn list_tips(&self) -> ClientResult<Vec<Tip>> {
        self.get_json("awareness/tips").await
    }

    pub async fn create_tip(&self, input: &TipInput) -> ClientResult<Value> {
        input.validate()?;
        self.send_json(Method::POST, "awareness/tips", input).await
    }

    pub async fn update_tip(&self, tip_id: i64, input: &TipInput) -> ClientResult<Value> {
        input.validate()?;
        self.send_json(Method::PUT, &format!("awareness/tips/{tip_id}"), input)
            .await
    }

    pub async fn delete_tip(&self, tip_id: i64) -> ClientResult<()> {
        self.delete(&format!("awareness/tips/{tip_id}")).await
    }

    // ---- training ----

    pub async fn list_trainings(&self) -> ClientResult<Vec<Training>> {
        self.get_json("training").await
    }

    pub async fn create_training(&self, input: &TrainingInput) -> ClientResult<Training> {
        input.validate()?;
        self.send_json(Method::POST, "training", input).await
    }

    pub async fn delete_training(&self, training_id: i64) -> ClientResult<()> {
        self.delete(&format!("training/{training_id}")).await
    }

    pub async fn list_assignments(&self) -> ClientResult<Vec<TrainingAssignment>> {
        self.get_json("training-session").await
    }

    pub async fn assign_training(&self, input: &AssignmentInput) -> ClientResult<Value> {
        input.validate()?;
        self.send_json(Method::POST, "training-session", input).await
    }

    pub async fn delete_assignment(&self, assignment_id: i64) -> ClientResult<()> {
        self.delete(&format!("training-session/{assignment_id}")).await
    }

    // ---- policies ----

    pub async fn list_policies(&self) -> ClientResult<Vec<Policy>> {
        self.get_json("policies").await
    }

    pub async fn update_policy(&self, policy_id: i64, input: &PolicyInput) -> ClientResult<Policy> {
        input.validate()?;
        self.send_form(Method::PUT, &format!("policies/{policy_id}"), input)
            .await
    }

    pub async fn delete_policy(&self, policy_id: i64) -> ClientResult<()> {
        self.delete(&format!("policies/{policy_id}")).await
    }

    /// Raw document bytes, served as an attachment
    pub async fn download_policy(&self, policy_id: i64) -> ClientResult<Vec<u8>> {
        self.get_bytes(&format!("policies/{policy_id}/download")).await
    }

    /// Raw document bytes for inline viewing
    pub async fn preview_policy(&self, policy_id: i64) -> ClientResult<Vec<u8>> {
        self.get_bytes(&format!("policies/{policy_id}/preview")).await
    }
}
