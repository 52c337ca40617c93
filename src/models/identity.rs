//! Authenticated identity and auth request bodies.

use serde::{Deserialize, Serialize};

/// The principal returned by `POST /api/auth/login`.
///
/// Held only by [`crate::state::SessionStore`] for the duration of a login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInformation {
    #[serde(default)]
    pub token: String,
    #[serde(rename = "type", default = "default_token_type")]
    pub token_type: String,
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub admin: bool,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl SessionInformation {
    /// Value for the `Authorization` header, if the login carried a token
    pub fn authorization(&self) -> Option<String> {
        if self.token.is_empty() {
            None
        } else {
            Some(format!("{} {}", self.token_type, self.token))
        }
    }
}

// Token stays out of logs
impl std::fmt::Debug for SessionInformation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionInformation")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("admin", &self.admin)
            .field("token_type", &self.token_type)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}
