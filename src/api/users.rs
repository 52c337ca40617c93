//! User account resource.

use reqwest::Method;

use super::client::ApiClient;
use super::error::{ApiError, Intent};
use crate::models::User;

const PATH: &str = "/user";

#[derive(Clone)]
pub struct UserGateway {
    client: ApiClient,
}

impl UserGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_by_id(&self, id: u64) -> Result<User, ApiError> {
        self.client.get_json(&format!("{}/{}", PATH, id)).await
    }

    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        self.client
            .send_empty::<()>(Method::DELETE, &format!("{}/{}", PATH, id), None, Intent::Write)
            .await
    }
}
