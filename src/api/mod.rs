//! Gateways to the yoga studio REST API.
//!
//! One gateway per resource; each operation issues exactly one request
//! through the shared [`ApiClient`] and never retries.

pub mod auth;
pub mod client;
pub mod error;
pub mod sessions;
pub mod teachers;
pub mod users;

pub use auth::AuthGateway;
pub use client::ApiClient;
pub use error::{ApiError, Intent};
pub use sessions::SessionGateway;
pub use teachers::TeacherGateway;
pub use users::UserGateway;
