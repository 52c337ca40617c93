//! Yoga class session models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::common::{optional_timestamp, timestamp};

/// Date format used by the session form and by write payloads
pub const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

/// A yoga class as returned by `GET /api/session/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YogaSession {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "timestamp")]
    pub date: DateTime<Utc>,
    pub teacher_id: u64,
    /// Participant user ids, in server order
    #[serde(default)]
    pub users: Vec<u64>,
    #[serde(
        rename = "createdAt",
        default,
        with = "optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "updatedAt",
        default,
        with = "optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl YogaSession {
    pub fn has_participant(&self, user_id: u64) -> bool {
        self.users.contains(&user_id)
    }

    pub fn attendee_count(&self) -> usize {
        self.users.len()
    }

    /// The session date as the form's `YYYY-MM-DD` text
    pub fn form_date(&self) -> String {
        self.date.format(FORM_DATE_FORMAT).to_string()
    }

    /// Writable fields of this session, e.g. to compare against what was sent
    pub fn to_payload(&self) -> SessionPayload {
        SessionPayload {
            name: self.name.clone(),
            date: self.date.date_naive(),
            teacher_id: self.teacher_id,
            description: self.description.clone(),
            users: self.users.clone(),
        }
    }
}

/// Body for `POST /api/session` and `PUT /api/session/{id}`.
///
/// Updates replace the whole record, so `users` carries the current
/// participants when editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    pub name: String,
    /// Serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    pub teacher_id: u64,
    pub description: String,
    #[serde(default)]
    pub users: Vec<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_from_api_json() {
        let session: YogaSession = serde_json::from_value(json!({
            "id": 123,
            "name": "My Test Session",
            "date": "2025-04-25T00:00:00.000Z",
            "teacher_id": 1,
            "description": "This is a test description for my session.",
            "users": [],
            "createdAt": "2025-04-20T10:00:00.000Z",
            "updatedAt": "2025-04-21T10:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(session.id, 123);
        assert_eq!(session.form_date(), "2025-04-25");
        assert_eq!(session.attendee_count(), 0);
        assert!(session.created_at.is_some());
    }

    #[test]
    fn test_session_create_response_without_users() {
        // POST responses omit users and timestamps and send a bare date
        let session: YogaSession = serde_json::from_value(json!({
            "id": 123,
            "name": "My Test Session",
            "date": "2025-04-25",
            "teacher_id": 1,
            "description": "This is a test description for my session."
        }))
        .unwrap();

        assert!(session.users.is_empty());
        assert!(session.updated_at.is_none());
        assert_eq!(session.form_date(), "2025-04-25");
    }

    #[test]
    fn test_participants() {
        let session: YogaSession = serde_json::from_value(json!({
            "id": 1,
            "name": "Morning flow",
            "date": "2025-06-01T00:00:00Z",
            "teacher_id": 42,
            "users": [1, 2, 3]
        }))
        .unwrap();

        assert!(session.has_participant(2));
        assert!(!session.has_participant(4));
        assert_eq!(session.attendee_count(), 3);
    }

    #[test]
    fn test_payload_date_is_form_text() {
        let payload = SessionPayload {
            name: "Mock Session".into(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            teacher_id: 42,
            description: "Test description".into(),
            users: vec![],
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["date"], "2025-06-01");
        assert_eq!(json["teacher_id"], 42);
    }
}
