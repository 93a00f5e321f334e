// Quiz-taking flow

pub mod controller;

use async_trait::async_trait;

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::models::{Attempt, AttemptRecord, Quiz};

pub use controller::{LoadOutcome, LoadTicket, QuizPhase, QuizSessionController, QuizView, SubmitOutcome};

/// Where a quiz session gets its ordered question list
#[async_trait]
pub trait QuizSource: Send + Sync {
    async fn fetch_quizzes(&self, topic_id: Option<i64>) -> ClientResult<Vec<Quiz>>;
}

/// Where submitted answers go
#[async_trait]
pub trait AttemptSink: Send + Sync {
    async fn record_attempt(&self, attempt: &Attempt) -> ClientResult<AttemptRecord>;
}

#[async_trait]
impl QuizSource for ApiClient {
    async fn fetch_quizzes(&self, topic_id: Option<i64>) -> ClientResult<Vec<Quiz>> {
        self.list_quizzes(topic_id).await
    }
}

#[async_trait]
impl AttemptSink for ApiClient {
    async fn record_attempt(&self, attempt: &Attempt) -> ClientResult<AttemptRecord> {
        ApiClient::record_attempt(self, attempt).await
    }
}
