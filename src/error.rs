// Client error taxonomy
use serde_json::{json, Value};
use thiserror::Error;

/// Everything a client operation can fail with.
///
/// Validation and selection errors are raised locally and never reach the
/// network. Network and authorization failures surface to the caller as a
/// visible notice; nothing here is retried automatically.
#[derive(Debug, Error)]
pub enum ClientError {
    // Transport level: refused connection, timeout, TLS
    #[error("Network failure: {0}")]
    Network(String),

    // Client-side field checks
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    // 401 from the API; the session store has already been cleared
    #[error("Session expired or invalid, please log in again")]
    Unauthorized { redirect_to: String },

    // Access policy denial
    #[error("Access denied, redirecting to {redirect_to}")]
    Forbidden { redirect_to: String },

    #[error("Please select an answer before submitting")]
    MissingSelection,

    #[error("Quiz {quiz_id} is not the question currently displayed")]
    SelectionOutOfScope { quiz_id: i64 },

    #[error("The answer to quiz {quiz_id} was already recorded")]
    AlreadyRecorded { quiz_id: i64 },

    #[error("No quiz session is in progress")]
    NotInProgress,

    // Any other non-success response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ClientError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        ClientError::Unauthorized {
            redirect_to: crate::policy::LOGIN_PATH.to_string(),
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        ClientError::Api {
            status,
            message: message.into(),
        }
    }

    /// Stable code for scripted consumers of `--json` output
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Network(_) => "NETWORK_FAILURE",
            ClientError::Validation { .. } => "VALIDATION_FAILURE",
            ClientError::Unauthorized { .. } => "UNAUTHORIZED",
            ClientError::Forbidden { .. } => "FORBIDDEN",
            ClientError::MissingSelection => "MISSING_SELECTION",
            ClientError::SelectionOutOfScope { .. } => "SELECTION_OUT_OF_SCOPE",
            ClientError::AlreadyRecorded { .. } => "ALREADY_RECORDED",
            ClientError::NotInProgress => "NOT_IN_PROGRESS",
            ClientError::Api { .. } => "API_ERROR",
            ClientError::Decode(_) => "DECODE_ERROR",
            ClientError::Storage(_) => "STORAGE_ERROR",
            ClientError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Errors resolved locally, before any request is made
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::Validation { .. }
                | ClientError::MissingSelection
                | ClientError::SelectionOutOfScope { .. }
                | ClientError::AlreadyRecorded { .. }
                | ClientError::NotInProgress
                | ClientError::Forbidden { .. }
        )
    }

    /// Where the user should be sent after this error, if anywhere
    pub fn redirect_to(&self) -> Option<&str> {
        match self {
            ClientError::Unauthorized { redirect_to } | ClientError::Forbidden { redirect_to } => {
                Some(redirect_to)
            }
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "success": false,
            "error": self.to_string(),
            "error_code": self.error_code(),
        });

        if let Some(path) = self.redirect_to() {
            body["redirect_to"] = json!(path);
        }
        if let ClientError::Validation { field, .. } = self {
            body["field"] = json!(field);
        }

        body
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
