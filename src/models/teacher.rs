//! Teacher model. Read-only from the client side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::optional_timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, with = "optional_timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "optional_timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Teacher {
    /// Name as shown on the session detail page, e.g. "John DOE"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name.to_uppercase())
    }

    /// Name as listed in the teacher picker, e.g. "John Doe"
    pub fn option_label(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
