//! Wire models for the yoga studio API, split by resource.

pub mod common;
pub mod identity;
pub mod session;
pub mod teacher;
pub mod user;

pub use common::*;
pub use identity::*;
pub use session::*;
pub use teacher::*;
pub use user::*;
