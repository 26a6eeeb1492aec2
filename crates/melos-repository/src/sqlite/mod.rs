//! SQLite implementations of the store traits.

mod catalog_store;
mod credential_store;

pub use catalog_store::SqliteCatalogStore;
pub use credential_store::SqliteCredentialStore;
