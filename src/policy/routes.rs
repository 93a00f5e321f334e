use chrono::Utc;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::models::{Identity, Role};
use crate::policy::{decide, home_path, Decision, LOGIN_PATH};
use crate::session::{token, SessionStore};

#[derive(Debug, Clone)]
pub struct RouteRule {
    pub path: &'static str,
    pub allowed: Vec<Role>,
}

fn rule(path: &'static str, allowed: &[Role]) -> RouteRule {
    RouteRule {
        path,
        allowed: allowed.to_vec(),
    }
}

/// Every protected screen and who may open it
pub static ROUTES: Lazy<Vec<RouteRule>> = Lazy::new(|| {
    use Role::{Admin, Staff, SuperAdmin};

    vec![
        // SuperAdmin
        rule("/dashboard", &[SuperAdmin]),
        rule("/staff", &[SuperAdmin]),
        rule("/topics", &[SuperAdmin]),
        rule("/add-quiz", &[SuperAdmin]),
        rule("/reports", &[SuperAdmin]),
        // Admin
        rule("/admin-dashboard", &[Admin]),
        rule("/manage-tips", &[SuperAdmin, Admin]),
        rule("/assign-training", &[SuperAdmin, Admin]),
        // Staff
        rule("/staff-dashboard", &[Staff]),
        rule("/staff-awareness-topics", &[Staff]),
        rule("/send-tips", &[Staff]),
        rule("/quiz", &[Staff]),
        // Shared
        rule("/tips", &[SuperAdmin, Admin, Staff]),
        rule("/profile", &[SuperAdmin, Admin, Staff]),
        rule("/training", &[SuperAdmin, Admin, Staff]),
        rule("/topic-view", &[SuperAdmin, Admin, Staff]),
        // Policy documents: everyone reads, SuperAdmin manages
        rule("/policies", &[SuperAdmin, Admin, Staff]),
        rule("/manage-policies", &[SuperAdmin]),
    ]
});

pub fn route_rule(path: &str) -> Option<&'static RouteRule> {
    ROUTES.iter().find(|r| r.path == path)
}

/// Gate a route against the session store.
///
/// Returns the live identity when allowed. Without a usable session the
/// error is `Unauthorized` (back to login); a role mismatch or an unknown
/// route is `Forbidden` with the role's home dashboard.
pub fn guard(path: &str, store: &SessionStore) -> ClientResult<Identity> {
    let identity = store.get()?;
    let has_valid_session = identity
        .as_ref()
        .map(|i| !token::is_expired(&i.token, Utc::now()))
        .unwrap_or(false);
    let role = identity.as_ref().map(|i| i.role());

    let decision = match route_rule(path) {
        Some(rule) => decide(role, has_valid_session, path, &rule.allowed),
        None if !has_valid_session => Decision::RedirectTo(LOGIN_PATH.to_string()),
        None => Decision::RedirectTo(
            role.map(home_path).unwrap_or(LOGIN_PATH).to_string(),
        ),
    };
    debug!(route = path, ?decision, "route guard");

    match (decision, identity) {
        (Decision::Allow, Some(identity)) => Ok(identity),
        (Decision::RedirectTo(to), _) if !has_valid_session || to == LOGIN_PATH => {
            Err(ClientError::Unauthorized { redirect_to: to })
        }
        (Decision::RedirectTo(to), _) => Err(ClientError::Forbidden { redirect_to: to }),
        (Decision::Allow, None) => Err(ClientError::unauthorized()),
    }
}
