//! Resource controllers.

pub mod health_controller;
pub mod lyrics_controller;
pub mod search_controller;
pub mod track_controller;
pub mod user_controller;
