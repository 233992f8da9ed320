//! API middleware.

mod auth;

pub use auth::{auth_middleware, require_coach, CurrentUser, MSG_NOT_COACH};
