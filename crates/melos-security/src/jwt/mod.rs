//! JWT session tokens for "my data" endpoints.

mod claims;
mod token_provider;

pub use claims::Claims;
pub use token_provider::TokenProvider;
