//! Domain records decoded at the store boundary.
//!
//! The cache layer only ever stores these pre-decoded, serde-validated
//! values, never raw rows.

pub mod api_key;
pub mod lyrics;
pub mod track;
pub mod user;

pub use api_key::*;
pub use lyrics::*;
pub use track::*;
pub use user::*;
