//! # Melos Security
//!
//! Credential handling for the Melos API: JWT session tokens for
//! user-scoped endpoints, and the constant-time master-key check used by
//! the authorization gate.

pub mod apikey;
pub mod jwt;

pub use apikey::*;
pub use jwt::*;
