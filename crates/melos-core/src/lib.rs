//! # Melos Core
//!
//! Core types, error definitions, and domain records for the Melos music
//! catalog API. Every other crate in the workspace builds on these
//! abstractions.

pub mod domain;
pub mod error;
pub mod result;

pub use domain::*;
pub use error::*;
pub use result::*;
