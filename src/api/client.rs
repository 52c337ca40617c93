//! Shared HTTP plumbing for the resource gateways.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::error::{ApiError, Intent};
use crate::config::ApiConfig;
use crate::state::SessionStore;

/// Path prefix every endpoint lives under
const API_PREFIX: &str = "/api";

/// HTTP client bound to one API server and one [`SessionStore`].
///
/// Cheap to clone; clones share the connection pool and the store. Every
/// request carries the stored identity's `Authorization` header, read at send
/// time so a login or logout applies to the very next call.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    store: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, store: Arc<SessionStore>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        // No timeout unless configured
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            store,
        })
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint path such as `/session/1`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.store.bearer() {
            Some(bearer) => builder.header(reqwest::header::AUTHORIZATION, bearer),
            None => builder,
        }
    }

    /// Send one request and fail on any non-success status
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        intent: Intent,
    ) -> Result<Response, ApiError> {
        debug!(method = %method, path = %path, "API request");

        let mut request = self.request(method.clone(), path);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(method = %method, path = %path, error = %e, "API request failed");
            ApiError::Network(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            "API returned error status"
        );
        Err(ApiError::from_response(status, &self.url(path), body, intent))
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response, path: &str) -> Result<T, ApiError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            path: self.url(path),
            source,
        })
    }

    fn encode<B: Serialize>(body: &B) -> Result<serde_json::Value, ApiError> {
        serde_json::to_value(body).map_err(ApiError::Encode)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(Method::GET, path, None, Intent::Read).await?;
        self.decode(response, path).await
    }

    /// Send a JSON body and decode a JSON response
    pub(crate) async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        intent: Intent,
    ) -> Result<T, ApiError> {
        let body = Self::encode(body)?;
        let response = self.execute(method, path, Some(body), intent).await?;
        self.decode(response, path).await
    }

    /// Send a request whose successful response body is irrelevant
    pub(crate) async fn send_empty<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        intent: Intent,
    ) -> Result<(), ApiError> {
        let body = body.map(Self::encode).transpose()?;
        self.execute(method, path, body, intent).await?;
        Ok(())
    }
}
