//! Client-side API error handling.
//!
//! Gateways turn every failed exchange into an [`ApiError`] while keeping the
//! HTTP status and body. Deciding what to show the user is left to the views.

use reqwest::StatusCode;

use crate::models::MessageResponse;

/// What a request was trying to do, which decides how a 4xx is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// GET requests
    Read,
    /// POST/PUT/DELETE on resources
    Write,
    /// Credential exchange, where 400 and 401 both mean bad credentials
    Login,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Rejected write (4xx). `message` comes from the `{message}` body when present
    #[error("{message}")]
    Validation { status: StatusCode, message: String },

    /// Bad credentials on login, or 401 anywhere else
    #[error("authentication failed ({status})")]
    Authentication { status: StatusCode },

    #[error("resource not found: {path}")]
    NotFound { path: String },

    #[error("server returned {status}: {body}")]
    Server { status: StatusCode, body: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("unexpected response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Classify a non-success response
    pub fn from_response(status: StatusCode, path: &str, body: String, intent: Intent) -> Self {
        if status == StatusCode::UNAUTHORIZED
            || (intent == Intent::Login && status == StatusCode::BAD_REQUEST)
        {
            return ApiError::Authentication { status };
        }

        if status == StatusCode::NOT_FOUND {
            return ApiError::NotFound {
                path: path.to_string(),
            };
        }

        if intent == Intent::Write && status.is_client_error() {
            let message = serde_json::from_str::<MessageResponse>(&body)
                .map(|parsed| parsed.message)
                .unwrap_or_else(|_| {
                    if body.trim().is_empty() {
                        status
                            .canonical_reason()
                            .unwrap_or("Request rejected")
                            .to_string()
                    } else {
                        body.clone()
                    }
                });
            return ApiError::Validation { status, message };
        }

        ApiError::Server { status, body }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "validation_error",
            ApiError::Authentication { .. } => "authentication_error",
            ApiError::NotFound { .. } => "not_found",
            ApiError::Server { .. } => "server_error",
            ApiError::Network(_) => "network_error",
            ApiError::Encode(_) => "encode_error",
            ApiError::Decode { .. } => "decode_error",
        }
    }

    /// HTTP status of the failed response, when there was one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Validation { status, .. }
            | ApiError::Authentication { status }
            | ApiError::Server { status, .. } => Some(*status),
            ApiError::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            ApiError::Network(err) => err.status(),
            ApiError::Encode(_) | ApiError::Decode { .. } => None,
        }
    }

    /// Text suitable for a toast or an inline error
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Validation { message, .. } => message.clone(),
            _ => "An error occurred".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_rejections_are_authentication_errors() {
        for status in [StatusCode::BAD_REQUEST, StatusCode::UNAUTHORIZED] {
            let err = ApiError::from_response(status, "/api/auth/login", String::new(), Intent::Login);
            assert_eq!(err.code(), "authentication_error");
            assert_eq!(err.status(), Some(status));
            assert_eq!(err.user_message(), "An error occurred");
        }
    }

    #[test]
    fn test_write_rejection_keeps_server_message() {
        let err = ApiError::from_response(
            StatusCode::BAD_REQUEST,
            "/api/auth/register",
            r#"{"message":"Error: Email is already taken!"}"#.to_string(),
            Intent::Write,
        );
        assert_eq!(err.code(), "validation_error");
        assert_eq!(err.user_message(), "Error: Email is already taken!");
        assert_eq!(err.to_string(), "Error: Email is already taken!");
    }

    #[test]
    fn test_write_rejection_without_json_body() {
        let err = ApiError::from_response(
            StatusCode::BAD_REQUEST,
            "/api/session",
            String::new(),
            Intent::Write,
        );
        assert_eq!(err.user_message(), "Bad Request");

        let err = ApiError::from_response(
            StatusCode::CONFLICT,
            "/api/session",
            "duplicate".to_string(),
            Intent::Write,
        );
        assert_eq!(err.user_message(), "duplicate");
    }

    #[test]
    fn test_not_found() {
        let err = ApiError::from_response(
            StatusCode::NOT_FOUND,
            "/api/session/9",
            String::new(),
            Intent::Read,
        );
        assert!(matches!(err, ApiError::NotFound { ref path } if path == "/api/session/9"));
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_other_statuses_are_preserved() {
        let err = ApiError::from_response(
            StatusCode::BAD_REQUEST,
            "/api/session/abc",
            "bad id".to_string(),
            Intent::Read,
        );
        match err {
            ApiError::Server { status, body } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(body, "bad id");
            }
            other => panic!("Expected Server error, got {:?}", other),
        }

        let err = ApiError::from_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "/api/session",
            "boom".to_string(),
            Intent::Write,
        );
        assert_eq!(err.code(), "server_error");
        assert_eq!(err.user_message(), "An error occurred");
    }
}
