//! In-process fake of the yoga studio API for tests.
//!
//! Serves canned JSON per `(method, path)` and records every request it sees.
//! Several responses registered for the same route are served in order, and
//! the last one keeps being served afterwards.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::api::ApiClient;
use crate::config::ApiConfig;
use crate::state::SessionStore;
use crate::views::{ToastLog, ViewContext};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: Option<Value>,
    delay: Option<Duration>,
}

#[derive(Default)]
struct FakeState {
    routes: Mutex<HashMap<(String, String), Vec<Canned>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeState {
    fn next_response(&self, method: &str, path: &str) -> Option<Canned> {
        let mut routes = self.routes.lock();
        let queue = routes.get_mut(&(method.to_string(), path.to_string()))?;
        if queue.len() > 1 {
            Some(queue.remove(0))
        } else {
            queue.first().cloned()
        }
    }
}

pub struct FakeApi {
    state: Arc<FakeState>,
    base_url: String,
}

impl FakeApi {
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            state,
            base_url: format!("http://{}", addr),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn push(&self, method: &str, path: &str, canned: Canned) -> &Self {
        self.state
            .routes
            .lock()
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push(canned);
        self
    }

    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) -> &Self {
        self.push(
            method,
            path,
            Canned {
                status: StatusCode::from_u16(status).unwrap(),
                body: Some(body),
                delay: None,
            },
        )
    }

    pub fn respond_empty(&self, method: &str, path: &str, status: u16) -> &Self {
        self.push(
            method,
            path,
            Canned {
                status: StatusCode::from_u16(status).unwrap(),
                body: None,
                delay: None,
            },
        )
    }

    /// Like [`FakeApi::respond`], but holds the response back for `delay`
    pub fn respond_slowly(
        &self,
        method: &str,
        path: &str,
        status: u16,
        body: Value,
        delay: Duration,
    ) -> &Self {
        self.push(
            method,
            path,
            Canned {
                status: StatusCode::from_u16(status).unwrap(),
                body: Some(body),
                delay: Some(delay),
            },
        )
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.state
            .requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Number of non-GET requests seen so far
    pub fn write_count(&self) -> usize {
        self.state
            .requests
            .lock()
            .iter()
            .filter(|r| r.method != "GET")
            .count()
    }

    pub fn config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            timeout_secs: Some(5),
        }
    }

    /// A client with a fresh, logged-out store
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.config(), Arc::new(SessionStore::new())).unwrap()
    }

    /// A view context over a fresh store, plus the toasts it will show
    pub fn context(&self) -> (ViewContext, Arc<ToastLog>) {
        let toasts = Arc::new(ToastLog::new());
        let ctx = ViewContext::new(self.client(), toasts.clone(), Duration::from_millis(3000));
        (ctx, toasts)
    }
}

async fn handle(
    State(state): State<Arc<FakeState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let authorization = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);
    let body = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(&body).ok()
    };

    state.requests.lock().push(RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        authorization,
        body,
    });

    let canned = state.next_response(method.as_str(), &path);
    match canned {
        Some(canned) => {
            if let Some(delay) = canned.delay {
                tokio::time::sleep(delay).await;
            }
            match canned.body {
                Some(body) => (canned.status, Json(body)).into_response(),
                None => canned.status.into_response(),
            }
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": format!("No route for {} {}", method, path)})),
        )
            .into_response(),
    }
}

/// JSON and model builders shared by the test modules
pub mod fixtures {
    use serde_json::{json, Value};

    use crate::models::SessionInformation;

    pub fn identity(id: u64, admin: bool) -> SessionInformation {
        SessionInformation {
            token: "abc123".to_string(),
            token_type: "Bearer".to_string(),
            id,
            username: "yoga@studio.com".to_string(),
            first_name: "Admin".to_string(),
            last_name: "Admin".to_string(),
            admin,
        }
    }

    pub fn identity_json(id: u64, admin: bool) -> Value {
        json!({
            "token": "abc123",
            "type": "Bearer",
            "id": id,
            "username": "yoga@studio.com",
            "firstName": "Admin",
            "lastName": "Admin",
            "admin": admin
        })
    }

    pub fn session_json(id: u64, teacher_id: u64, users: &[u64]) -> Value {
        json!({
            "id": id,
            "name": "My Test Session",
            "date": "2025-04-25T00:00:00.000Z",
            "teacher_id": teacher_id,
            "description": "This is a test description for my session.",
            "users": users,
            "createdAt": "2025-04-20T10:00:00.000Z",
            "updatedAt": "2025-04-21T10:00:00.000Z"
        })
    }

    pub fn teacher_json(id: u64, first_name: &str, last_name: &str) -> Value {
        json!({
            "id": id,
            "firstName": first_name,
            "lastName": last_name,
            "createdAt": "2025-01-01T00:00:00",
            "updatedAt": "2025-01-01T00:00:00"
        })
    }

    pub fn user_json(id: u64, admin: bool) -> Value {
        json!({
            "id": id,
            "email": "test@example.com",
            "lastName": "User",
            "firstName": "Test",
            "admin": admin,
            "createdAt": "2025-04-20T10:00:00",
            "updatedAt": "2025-04-21T10:00:00"
        })
    }
}
