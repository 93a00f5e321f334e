// Access policy: role -> route permission decisions

pub mod routes;

use crate::models::Role;

pub use routes::{guard, route_rule, RouteRule, ROUTES};

/// Public entry point; where unauthenticated users are sent
pub const LOGIN_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    RedirectTo(String),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Dashboard each role lands on; unknown roles go back to login
pub fn home_path(role: &Role) -> &'static str {
    match role {
        Role::SuperAdmin => "/dashboard",
        Role::Admin => "/admin-dashboard",
        Role::Staff => "/staff-dashboard",
        Role::Unknown(_) => LOGIN_PATH,
    }
}

/// Decide whether a session may open `requested_route`.
///
/// Pure: trusts the locally cached role and makes no server call, so the
/// result is UI gating and not a security boundary. `requested_route` is
/// part of the contract for callers that log or audit decisions; the
/// outcome depends only on the role and `allowed`.
pub fn decide(
    role: Option<&Role>,
    has_valid_session: bool,
    _requested_route: &str,
    allowed: &[Role],
) -> Decision {
    if !has_valid_session {
        return Decision::RedirectTo(LOGIN_PATH.to_string());
    }

    let Some(role) = role else {
        return Decision::RedirectTo(LOGIN_PATH.to_string());
    };

    if role.is_known() && allowed.contains(role) {
        Decision::Allow
    } else {
        Decision::RedirectTo(home_path(role).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_is_sent_to_their_dashboard() {
        let decision = decide(Some(&Role::parse("staff")), true, "/reports", &[Role::Admin]);
        assert_eq!(decision, Decision::RedirectTo("/staff-dashboard".into()));
    }

    #[test]
    fn missing_role_goes_to_login() {
        let everyone = [Role::SuperAdmin, Role::Admin, Role::Staff];
        assert_eq!(
            decide(None, false, "/tips", &everyone),
            Decision::RedirectTo("/".into())
        );
        assert_eq!(
            decide(None, true, "/tips", &everyone),
            Decision::RedirectTo("/".into())
        );
    }

    #[test]
    fn superadmin_allowed_when_listed() {
        let decision = decide(
            Some(&Role::parse("superadmin")),
            true,
            "/manage-tips",
            &[Role::SuperAdmin, Role::Admin],
        );
        assert!(decision.is_allowed());
    }

    #[test]
    fn no_session_wins_over_role() {
        let decision = decide(Some(&Role::SuperAdmin), false, "/dashboard", &[Role::SuperAdmin]);
        assert_eq!(decision, Decision::RedirectTo("/".into()));
    }

    #[test]
    fn each_role_has_a_home() {
        assert_eq!(
            decide(Some(&Role::SuperAdmin), true, "/quiz", &[Role::Staff]),
            Decision::RedirectTo("/dashboard".into())
        );
        assert_eq!(
            decide(Some(&Role::Admin), true, "/dashboard", &[Role::SuperAdmin]),
            Decision::RedirectTo("/admin-dashboard".into())
        );
        assert_eq!(
            decide(Some(&Role::parse("auditor")), true, "/tips", &[Role::Staff]),
            Decision::RedirectTo("/".into())
        );
    }

    #[test]
    fn unknown_role_is_never_allowed() {
        let odd = Role::parse("auditor");
        let decision = decide(Some(&odd), true, "/tips", &[odd.clone()]);
        assert_eq!(decision, Decision::RedirectTo("/".into()));
    }
}
