use std::sync::Arc;
use tracing::debug;

use crate::api::ApiClient;
use crate::cli::OutputFormat;
use crate::config::{self, AppConfig};
use crate::error::ClientResult;
use crate::models::Identity;
use crate::policy;
use crate::session::SessionStore;

/// Everything a command handler needs: resolved config, an API client bound
/// to this process's client session, and the output format.
pub struct CliContext {
    pub config: AppConfig,
    pub client: ApiClient,
    pub output: OutputFormat,
}

impl CliContext {
    /// Build from the global config, with `session` overriding the
    /// configured session name
    pub fn open(session: Option<&str>, output: OutputFormat) -> ClientResult<Self> {
        let mut config = config::config().clone();
        if let Some(name) = session.map(str::trim).filter(|s| !s.is_empty()) {
            config.storage.session_name = name.to_string();
        }

        let dir = config.config_dir()?;
        debug!(dir = %dir.display(), session = %config.storage.session_name, "opening session store");
        let store = Arc::new(SessionStore::open(&dir, &config.storage.session_name));
        Self::new(config, store, output)
    }

    pub fn new(config: AppConfig, store: Arc<SessionStore>, output: OutputFormat) -> ClientResult<Self> {
        let client = ApiClient::new(&config, store)?;
        Ok(Self {
            config,
            client,
            output,
        })
    }

    pub fn store(&self) -> &SessionStore {
        self.client.store()
    }

    pub fn session_name(&self) -> &str {
        &self.config.storage.session_name
    }

    /// Check the route the command belongs to, returning the identity it
    /// runs as
    pub fn guard(&self, route: &str) -> ClientResult<Identity> {
        policy::guard(route, self.store())
    }
}
