use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Platform role. Parsed case-insensitively; anything unrecognised is kept
/// verbatim so it can be reported, but it never grants access.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    SuperAdmin,
    Admin,
    Staff,
    Unknown(String),
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "superadmin" => Role::SuperAdmin,
            "admin" => Role::Admin,
            "staff" => Role::Staff,
            _ => Role::Unknown(raw.trim().to_string()),
        }
    }

    /// Canonical spelling used by the backend
    pub fn as_str(&self) -> &str {
        match self {
            Role::SuperAdmin => "SuperAdmin",
            Role::Admin => "Admin",
            Role::Staff => "Staff",
            Role::Unknown(raw) => raw,
        }
    }

    /// Lower-cased form kept in the session store's `role` key
    pub fn normalized(&self) -> String {
        self.as_str().to_lowercase()
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Role::Unknown(_))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Role::parse(s))
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(Role::parse(&raw))
    }
}

/// User block of the login response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> crate::error::ClientResult<()> {
        if self.email.is_empty() {
            return Err(crate::error::ClientError::validation("email", "is required"));
        }
        if !self.email.contains('@') {
            return Err(crate::error::ClientError::validation(
                "email",
                "must be an email address",
            ));
        }
        if self.password.is_empty() {
            return Err(crate::error::ClientError::validation("password", "is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Authenticated user cached for one client session: the login profile
/// plus the bearer token it was issued with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub token: String,
}

impl Identity {
    pub fn new(profile: UserProfile, token: impl Into<String>) -> Self {
        Self {
            profile,
            token: token.into(),
        }
    }

    pub fn user_id(&self) -> i64 {
        self.profile.user_id
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn role(&self) -> &Role {
        &self.profile.role
    }
}

impl From<LoginResponse> for Identity {
    fn from(response: LoginResponse) -> Self {
        Identity::new(response.user, response.token)
    }
}
