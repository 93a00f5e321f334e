// Session store: the one read/write path for the cached identity

pub mod storage;
pub mod token;

use std::path::Path;
use tracing::{debug, warn};

use crate::error::ClientResult;
use crate::models::{Identity, Role, UserProfile};
pub use storage::{FileStorage, MemoryStorage, Storage};

pub const USER_KEY: &str = "user";
pub const TOKEN_KEY: &str = "token";
pub const ROLE_KEY: &str = "role";
pub const LAST_LOGIN_ROLE_KEY: &str = "lastLoginRole";

/// Holds the authenticated identity of one client session.
///
/// `primary` is scoped to the session (one per terminal, like a browser
/// tab). `fallback` is shared by every session on the machine and is only
/// written with the non-authoritative last login role. Reads check the
/// primary store first.
pub struct SessionStore {
    primary: Box<dyn Storage>,
    fallback: Box<dyn Storage>,
}

impl SessionStore {
    pub fn new(primary: Box<dyn Storage>, fallback: Box<dyn Storage>) -> Self {
        Self { primary, fallback }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()), Box::new(MemoryStorage::new()))
    }

    /// File-backed store under `config_dir`: `sessions/<name>.json` for the
    /// session, `shared.json` for the fallback.
    pub fn open(config_dir: &Path, session_name: &str) -> Self {
        let file_name = format!("{}.json", sanitize_session_name(session_name));
        Self::new(
            Box::new(FileStorage::new(config_dir.join("sessions").join(file_name))),
            Box::new(FileStorage::new(config_dir.join("shared.json"))),
        )
    }

    pub fn set(&self, identity: &Identity) -> ClientResult<()> {
        let role = identity.role().normalized();

        self.primary
            .set_item(USER_KEY, &serde_json::to_string(identity)?)?;
        self.primary.set_item(TOKEN_KEY, &identity.token)?;
        self.primary.set_item(ROLE_KEY, &role)?;

        // Not used for authentication
        self.fallback.set_item(LAST_LOGIN_ROLE_KEY, &role)?;

        debug!(user_id = identity.user_id(), role = %role, "session stored");
        Ok(())
    }

    /// The cached identity, or `None` when the user record or the token is
    /// missing. A corrupt user record reads as no session.
    pub fn get(&self) -> ClientResult<Option<Identity>> {
        let Some((user, token)) = self.read_credentials()? else {
            return Ok(None);
        };

        match serde_json::from_str::<UserProfile>(&user) {
            Ok(profile) => Ok(Some(Identity::new(profile, token))),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable cached user record");
                Ok(None)
            }
        }
    }

    pub fn token(&self) -> ClientResult<Option<String>> {
        Ok(self.read_credentials()?.map(|(_, token)| token))
    }

    pub fn has_valid_session(&self) -> ClientResult<bool> {
        Ok(self.get()?.is_some())
    }

    /// Role of the live identity, if any
    pub fn role(&self) -> ClientResult<Option<Role>> {
        Ok(self.get()?.map(|identity| identity.profile.role))
    }

    /// Last role that logged in on this machine, from the shared store.
    /// Informational only.
    pub fn last_login_role(&self) -> ClientResult<Option<Role>> {
        Ok(self
            .fallback
            .get_item(LAST_LOGIN_ROLE_KEY)?
            .map(|raw| Role::parse(&raw)))
    }

    pub fn clear(&self) -> ClientResult<()> {
        self.primary.clear()?;
        self.fallback.clear()?;
        debug!("session cleared");
        Ok(())
    }

    /// User record and token, always taken together from one store
    fn read_credentials(&self) -> ClientResult<Option<(String, String)>> {
        for store in [&self.primary, &self.fallback] {
            let user = store.get_item(USER_KEY)?;
            let token = store.get_item(TOKEN_KEY)?.filter(|t| !t.is_empty());
            if let (Some(user), Some(token)) = (user, token) {
                return Ok(Some((user, token)));
            }
        }
        Ok(None)
    }
}

fn sanitize_session_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "default".to_string()
    } else {
        cleaned
    }
}
