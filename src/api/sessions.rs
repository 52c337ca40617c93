//! Yoga session resource and membership toggles.

use reqwest::Method;

use super::client::ApiClient;
use super::error::{ApiError, Intent};
use crate::models::{SessionPayload, YogaSession};

const PATH: &str = "/session";

#[derive(Clone)]
pub struct SessionGateway {
    client: ApiClient,
}

impl SessionGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// All sessions in server order. Never cached
    pub async fn all(&self) -> Result<Vec<YogaSession>, ApiError> {
        self.client.get_json(PATH).await
    }

    pub async fn detail(&self, id: u64) -> Result<YogaSession, ApiError> {
        self.client.get_json(&format!("{}/{}", PATH, id)).await
    }

    pub async fn create(&self, payload: &SessionPayload) -> Result<YogaSession, ApiError> {
        self.client
            .send_json(Method::POST, PATH, payload, Intent::Write)
            .await
    }

    /// Replace a session with `payload`
    pub async fn update(&self, id: u64, payload: &SessionPayload) -> Result<YogaSession, ApiError> {
        self.client
            .send_json(Method::PUT, &format!("{}/{}", PATH, id), payload, Intent::Write)
            .await
    }

    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        self.client
            .send_empty::<()>(Method::DELETE, &format!("{}/{}", PATH, id), None, Intent::Write)
            .await
    }

    /// Add `user_id` to the session's participants.
    ///
    /// Resolves without a payload; callers re-read the session to see the
    /// new participant list.
    pub async fn participate(&self, id: u64, user_id: u64) -> Result<(), ApiError> {
        self.client
            .send_empty::<()>(
                Method::POST,
                &participation_path(id, user_id),
                None,
                Intent::Write,
            )
            .await
    }

    /// Remove `user_id` from the session's participants
    pub async fn un_participate(&self, id: u64, user_id: u64) -> Result<(), ApiError> {
        self.client
            .send_empty::<()>(
                Method::DELETE,
                &participation_path(id, user_id),
                None,
                Intent::Write,
            )
            .await
    }
}

fn participation_path(id: u64, user_id: u64) -> String {
    format!("{}/{}/participate/{}", PATH, id, user_id)
}
