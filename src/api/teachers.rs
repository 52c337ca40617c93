//! Teacher resource. Read-only.

use super::client::ApiClient;
use super::error::ApiError;
use crate::models::Teacher;

const PATH: &str = "/teacher";

#[derive(Clone)]
pub struct TeacherGateway {
    client: ApiClient,
}

impl TeacherGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn all(&self) -> Result<Vec<Teacher>, ApiError> {
        self.client.get_json(PATH).await
    }

    pub async fn detail(&self, id: u64) -> Result<Teacher, ApiError> {
        self.client.get_json(&format!("{}/{}", PATH, id)).await
    }
}
