//! Issues and verifies the session tokens used to authenticate API requests.

mod middleware;
mod token;

pub use middleware::{AuthState, auth_guard};
pub use token::{TOKEN_DURATION, encode_token};
