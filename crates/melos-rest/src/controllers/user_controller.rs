//! User controller: "my data" endpoints for session-token callers.

use crate::{
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{extract::State, routing::get, Extension, Router};
use melos_core::{MelosError, User};
use melos_security::Claims;
use tracing::debug;

/// Creates the user router.
pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

/// Get the calling user's own record.
///
/// Claims are attached by the gate when the request carried a valid
/// session token; a master-key request without one is still rejected here.
async fn get_me(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
) -> ApiResult<User> {
    let Some(Extension(claims)) = claims else {
        return Err(MelosError::unauthorized("Session token required").into());
    };
    debug!("Get own user record: {}", claims.user_id());

    let user = state
        .credentials
        .find_user(claims.user_id())
        .await?
        .ok_or_else(|| MelosError::not_found("user", claims.user_id().to_owned()))?;

    ok(user)
}
