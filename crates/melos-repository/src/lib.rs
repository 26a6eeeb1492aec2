//! # Melos Repository
//!
//! Relational store access behind traits: the credential store consulted by
//! the authorization gate, and the catalog store behind the resource
//! handlers. All queries are parameterized; rows decode through typed row
//! structs into core domain records.

pub mod pool;
pub mod sqlite;
pub mod traits;

pub use pool::{create_pool, DatabasePool};
pub use sqlite::{SqliteCatalogStore, SqliteCredentialStore};
pub use traits::{CatalogStore, CredentialStore};
