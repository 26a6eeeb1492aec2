//! HTTP middleware: the authorization gate and request logging.

mod auth;
mod logging;

pub use auth::{authorization_gate, API_KEY_HEADER};
pub use logging::logging_middleware;
