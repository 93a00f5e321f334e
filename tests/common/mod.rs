#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use awareness_client::api::ApiClient;
use awareness_client::config::AppConfig;
use awareness_client::session::SessionStore;

pub const PASSWORD: &str = "correct horse";

/// In-process stand-in for the awareness platform API.
///
/// Each test starts its own instance on a free port; it lives as long as
/// the test's runtime.
pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
pub struct MockState {
    /// Authorization header of every authenticated request, in order
    pub auth_headers: Vec<Option<String>>,
    /// Attempt bodies accepted by POST /attempts
    pub attempts: Vec<Value>,
    /// Fail one POST /attempts with a 500 once this many have been accepted
    pub fail_after: Option<usize>,
    /// When set every token is rejected with 401
    pub tokens_revoked: bool,
    pub policy_updates: Vec<(i64, Vec<(String, String)>)>,
}

struct Account {
    user_id: i64,
    name: &'static str,
    email: &'static str,
    role: &'static str,
    department: &'static str,
}

// Roles deliberately use mixed casing, as the backend stores them
const ACCOUNTS: &[Account] = &[
    Account { user_id: 1, name: "Root Admin", email: "root@example.org", role: "SuperAdmin", department: "Security" },
    Account { user_id: 2, name: "Ada Admin", email: "admin@example.org", role: "admin", department: "IT" },
    Account { user_id: 7, name: "Sam Staff", email: "staff@example.org", role: "Staff", department: "IT" },
    Account { user_id: 8, name: "Fay Finance", email: "fay@example.org", role: "Staff", department: "Finance" },
];

impl MockBackend {
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let state = Arc::new(Mutex::new(MockState::default()));

        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/quizzes", get(quizzes))
            .route("/api/attempts", post(record_attempt))
            .route("/api/reports", get(reports))
            .route("/api/staff", get(staff))
            .route("/api/topics", get(topics))
            .route("/api/topics/:id", get(topic))
            .route("/api/awareness/tips", get(tips))
            .route("/api/training", get(trainings))
            .route("/api/training-session", get(training_sessions))
            .route("/api/policies/:id", put(update_policy))
            .route("/api/policies/:id/download", get(download_policy))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind mock backend")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}/api", port),
            state,
        })
    }

    pub fn config(&self) -> AppConfig {
        AppConfig::for_base_url(&self.base_url)
    }

    /// Client over a fresh in-memory session store
    pub fn client(&self) -> Result<ApiClient> {
        self.client_with(Arc::new(SessionStore::in_memory()))
    }

    pub fn client_with(&self, store: Arc<SessionStore>) -> Result<ApiClient> {
        Ok(ApiClient::new(&self.config(), store)?)
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state poisoned")
    }
}

type Shared = State<Arc<Mutex<MockState>>>;

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

/// Bearer check shared by every protected route; returns the caller's id
fn authorize(state: &Arc<Mutex<MockState>>, headers: &HeaderMap) -> Result<i64, Response> {
    let header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut state = state.lock().expect("mock state poisoned");
    state.auth_headers.push(header.clone());

    let user_id = header
        .as_deref()
        .and_then(|h| h.strip_prefix("Bearer token-"))
        .and_then(|id| id.parse::<i64>().ok());

    match user_id {
        Some(id) if !state.tokens_revoked => Ok(id),
        _ => Err(detail(StatusCode::UNAUTHORIZED, "Could not validate credentials")),
    }
}

fn account(user_id: i64) -> Option<&'static Account> {
    ACCOUNTS.iter().find(|a| a.user_id == user_id)
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(Json(body): Json<LoginBody>) -> Response {
    let Some(account) = ACCOUNTS.iter().find(|a| a.email == body.email) else {
        return detail(StatusCode::UNAUTHORIZED, "Invalid email or password");
    };
    if body.password != PASSWORD {
        return detail(StatusCode::UNAUTHORIZED, "Invalid email or password");
    }

    Json(json!({
        "token": format!("token-{}", account.user_id),
        "user": {
            "userId": account.user_id,
            "name": account.name,
            "email": account.email,
            "role": account.role,
            "department": account.department,
        }
    }))
    .into_response()
}

fn quiz_bank() -> Vec<Value> {
    (1..=3)
        .map(|id| {
            let topic_id = if id == 3 { 2 } else { 1 };
            json!({
                "quizId": id,
                "question": format!("Question {}?", id),
                "optionA": "Ignore it",
                "optionB": "Report it",
                "optionC": "Forward it",
                "optionD": "Reply to it",
                "correctAnswer": "B",
                "topicId": topic_id,
            })
        })
        .collect()
}

#[derive(Deserialize)]
struct QuizQuery {
    #[serde(rename = "topicId")]
    topic_id: Option<i64>,
}

async fn quizzes(State(state): Shared, headers: HeaderMap, Query(query): Query<QuizQuery>) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    let bank: Vec<Value> = quiz_bank()
        .into_iter()
        .filter(|q| query.topic_id.map_or(true, |t| q["topicId"] == json!(t)))
        .collect();
    Json(bank).into_response()
}

async fn record_attempt(State(state): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let mut state = state.lock().expect("mock state poisoned");
    if state.fail_after == Some(state.attempts.len()) {
        state.fail_after = None;
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable");
    }

    state.attempts.push(body.clone());
    let is_correct = i64::from(body["selectedAnswer"] == json!("B"));
    Json(json!({
        "attemptId": state.attempts.len(),
        "userId": body["userId"],
        "quizId": body["quizId"],
        "selectedAnswer": body["selectedAnswer"],
        "isCorrect": is_correct,
        "createdAt": "2025-03-01T09:00:00",
    }))
    .into_response()
}

async fn reports(State(state): Shared, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    // Deliberately not sorted by createdAt
    Json(json!([
        { "reportId": 1, "userId": 7, "totalAttempts": 4, "correctCount": 3, "awarenessScore": 75.0, "createdAt": "2025-01-10T08:00:00" },
        { "reportId": 2, "userId": 8, "totalAttempts": 2, "correctCount": 1, "awarenessScore": 50.0, "createdAt": "2025-03-02T08:00:00" },
        { "reportId": 3, "userId": 7, "totalAttempts": 5, "correctCount": 1, "awarenessScore": 20.0, "createdAt": "2025-02-14T08:00:00" },
        { "reportId": 4, "userId": 99, "totalAttempts": 1, "correctCount": null, "awarenessScore": null, "createdAt": null }
    ]))
    .into_response()
}

async fn staff(State(state): Shared, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    let records: Vec<Value> = ACCOUNTS
        .iter()
        .map(|a| {
            json!({
                "userId": a.user_id,
                "name": a.name,
                "email": a.email,
                "department": a.department,
                "role": a.role,
            })
        })
        .collect();
    Json(records).into_response()
}

async fn topics(State(state): Shared, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    Json(json!([
        { "topicId": 1, "title": "Phishing", "category": "Email" },
        { "topicId": 2, "title": "Passwords", "category": "Accounts" }
    ]))
    .into_response()
}

async fn tips(State(state): Shared, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    Json(json!([
        { "tipId": 1, "title": "Hover first", "description": "Check links before clicking", "category": "Email" }
    ]))
    .into_response()
}

async fn trainings(State(state): Shared, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    Json(json!([
        { "trainingId": 1, "title": "Secure browsing", "description": "Basics" },
        { "trainingId": 2, "title": "Incident reporting", "description": "Who to call" }
    ]))
    .into_response()
}

async fn training_sessions(State(state): Shared, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    Json(json!([
        { "sessionId": 10, "trainingId": 2, "userId": 7, "createdAt": "2025-03-03T10:00:00" },
        { "sessionId": 11, "trainingId": 1, "userId": 8, "createdAt": null }
    ]))
    .into_response()
}

async fn topic(State(state): Shared, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    if id != 1 {
        return detail(StatusCode::NOT_FOUND, "Topic not found");
    }
    Json(json!({
        "topicId": 1,
        "title": "Phishing",
        "description": "Spotting suspicious email",
        "link": "https://example.org/phishing",
        "category": "Email",
        "file_path": null,
    }))
    .into_response()
}

async fn update_policy(
    State(state): Shared,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    let caller = match authorize(&state, &headers) {
        Ok(id) => id,
        Err(denied) => return denied,
    };
    if account(caller).map(|a| a.role) != Some("SuperAdmin") {
        return detail(StatusCode::FORBIDDEN, "Only SuperAdmin can update");
    }

    let title = fields
        .iter()
        .find(|(k, _)| k == "title")
        .map(|(_, v)| v.clone())
        .unwrap_or_default();
    state
        .lock()
        .expect("mock state poisoned")
        .policy_updates
        .push((id, fields));

    Json(json!({
        "policyId": id,
        "title": title,
        "filePath": "uploads/policies/aup.pdf",
        "downloadCount": 3,
    }))
    .into_response()
}

async fn download_policy(State(state): Shared, headers: HeaderMap, Path(_id): Path<i64>) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    (StatusCode::OK, b"%PDF-1.4 mock".to_vec()).into_response()
}
