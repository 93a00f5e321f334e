use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub quiz: QuizConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitMode {
    /// One attempt per answered question
    AllAnswered,
    /// Only the question on screen at submit time
    CurrentOnly,
}

impl SubmitMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().replace('-', "_").as_str() {
            "all" | "all_answered" => Some(SubmitMode::AllAnswered),
            "current" | "current_only" => Some(SubmitMode::CurrentOnly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    pub submit_mode: SubmitMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides `$HOME/.config/aware`
    pub config_dir: Option<PathBuf>,
    /// Name of the client session this process belongs to
    pub session_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("AWARE_API_URL") {
            self.api.base_url = v.trim().trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("AWARE_REQUEST_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }

        if let Ok(v) = env::var("AWARE_SUBMIT_MODE") {
            self.quiz.submit_mode = SubmitMode::parse(&v).unwrap_or(self.quiz.submit_mode);
        }

        if let Ok(v) = env::var("AWARE_CONFIG_DIR") {
            self.storage.config_dir = Some(PathBuf::from(v));
        }
        if let Ok(v) = env::var("AWARE_SESSION") {
            if !v.trim().is_empty() {
                self.storage.session_name = v.trim().to_string();
            }
        }

        if let Ok(v) = env::var("AWARE_LOG") {
            self.logging.filter = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://127.0.0.1:8000/api".to_string(),
                request_timeout_secs: 30,
            },
            quiz: QuizConfig {
                submit_mode: SubmitMode::AllAnswered,
            },
            storage: StorageConfig {
                config_dir: None,
                session_name: "default".to_string(),
            },
            logging: LoggingConfig {
                filter: "awareness_client=debug,warn".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "https://staging.awareness.example.com/api".to_string(),
                request_timeout_secs: 15,
            },
            logging: LoggingConfig {
                filter: "awareness_client=info,warn".to_string(),
            },
            ..Self::development()
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://awareness.example.com/api".to_string(),
                request_timeout_secs: 10,
            },
            logging: LoggingConfig {
                filter: "warn".to_string(),
            },
            ..Self::development()
        }
    }

    /// Configuration pointed at an explicit backend, for tests and embedding
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        let mut config = Self::development();
        config.api.base_url = base_url.into().trim_end_matches('/').to_string();
        config
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs.max(1))
    }

    /// Parsed API root; always ends with a slash so relative joins keep
    /// the `/api` prefix.
    pub fn base_url(&self) -> ClientResult<url::Url> {
        let mut raw = self.api.base_url.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        url::Url::parse(&raw)
            .map_err(|e| ClientError::Config(format!("invalid API URL '{}': {}", self.api.base_url, e)))
    }

    pub fn config_dir(&self) -> ClientResult<PathBuf> {
        if let Some(dir) = &self.storage.config_dir {
            return Ok(dir.clone());
        }
        let home = env::var("HOME")
            .map_err(|_| ClientError::Config("HOME environment variable not set".to_string()))?;
        Ok(PathBuf::from(home).join(".config").join("aware"))
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}
