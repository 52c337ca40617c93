//! User account model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::optional_timestamp;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub admin: bool,
    /// Accepted if the server sends it, never written back out
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default, with = "optional_timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "optional_timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Name as shown on the account page, e.g. "Test USER"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name.to_uppercase())
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("admin", &self.admin)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_is_never_written_or_printed() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": 1,
            "email": "test@example.com",
            "lastName": "User",
            "firstName": "Test",
            "admin": false,
            "password": "secret",
            "createdAt": "2025-04-20T10:00:00"
        }))
        .unwrap();

        assert_eq!(user.password.as_deref(), Some("secret"));
        assert!(!format!("{:?}", user).contains("secret"));

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(user.display_name(), "Test USER");
    }
}
