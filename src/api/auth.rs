//! Login and registration.

use reqwest::Method;

use super::client::ApiClient;
use super::error::{ApiError, Intent};
use crate::models::{LoginRequest, RegisterRequest, SessionInformation};

const PATH: &str = "/auth";

/// Credential exchange against `/api/auth`.
///
/// Does not touch the [`crate::state::SessionStore`]: a successful login
/// returns the identity and the caller decides whether to store it.
#[derive(Clone)]
pub struct AuthGateway {
    client: ApiClient,
}

impl AuthGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Create an account. Rejections come back as [`ApiError::Validation`]
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        self.client
            .send_empty(
                Method::POST,
                &format!("{}/register", PATH),
                Some(request),
                Intent::Write,
            )
            .await
    }

    /// Exchange credentials for an identity. Bad credentials come back as
    /// [`ApiError::Authentication`]
    pub async fn login(&self, request: &LoginRequest) -> Result<SessionInformation, ApiError> {
        self.client
            .send_json(
                Method::POST,
                &format!("{}/login", PATH),
                request,
                Intent::Login,
            )
            .await
    }
}
