//! # Melos Config
//!
//! Layered configuration loading for the Melos API: packaged defaults,
//! per-environment TOML files, local overrides, and `MELOS_`-prefixed
//! environment variables.

pub mod app_config;
pub mod loader;

pub use app_config::*;
pub use loader::*;
