//! # Melos REST
//!
//! The HTTP surface of the Melos API: the axum router, the authorization
//! gate that fronts every non-public route, and the resource controllers
//! that read through the cache and invalidate it on writes.

pub mod controllers;
pub mod middleware;
pub mod responses;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
