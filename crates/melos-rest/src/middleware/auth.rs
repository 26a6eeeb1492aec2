//! Authorization gate middleware.
//!
//! Every request passes through here before any handler runs. The checks
//! are ordered: session-token extraction, public-route bypass, missing-key
//! rejection, master-key comparison, write restriction, scoped-key lookup,
//! rate check. A failure at any step is terminal; the only side effect of a
//! rejected request is the rate-counter increment in the rate check itself.

use crate::{responses::rejection, state::AppState};
use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use melos_cache::keys;
use melos_core::{ApiKeyRecord, Clearance};
use melos_security::{is_master_key, Claims};
use std::sync::Arc;
use tracing::{debug, warn};

/// Header carrying the API credential.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Cookie carrying a session token, for browser clients that cannot set
/// the Authorization header.
const TOKEN_COOKIE: &str = "token";

/// The authorization gate.
pub async fn authorization_gate(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    // Session tokens ride alongside API keys and only govern the
    // user-scoped endpoints. Extract and validate independently of the
    // key checks; an invalid token is dropped, not rejected, because the
    // request may still carry a valid key.
    if let Some(token) = extract_session_token(&request) {
        match state.token_provider.validate_token(&token) {
            Ok(claims) => {
                debug!("Session token accepted for user {}", claims.user_id());
                request.extensions_mut().insert(claims);
            }
            Err(e) => {
                debug!("Session token rejected: {}", e);
            }
        }
    }

    if is_public_path(request.uri().path()) {
        return next.run(request).await;
    }

    let api_key = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    let Some(api_key) = api_key else {
        // A valid session token alone may read the caller's own data.
        if request.extensions().get::<Claims>().is_some()
            && is_session_scope(request.uri().path(), request.method())
        {
            return next.run(request).await;
        }
        return rejection(StatusCode::UNAUTHORIZED, "E_AUTH");
    };

    if is_master_key(&api_key, state.security.master_key.as_deref()) {
        request.extensions_mut().insert(Clearance::master());
        return next.run(request).await;
    }

    // Scoped keys are read-only. Checked before the store lookup so a
    // denied write never costs a credential fetch or rate budget.
    if is_mutating(request.method()) {
        return rejection(StatusCode::FORBIDDEN, "E_ACCESS");
    }

    let record = match resolve_api_key(&state, &api_key).await {
        Ok(Some(record)) if record.is_active => record,
        Ok(_) => return rejection(StatusCode::UNAUTHORIZED, "E_AUTH"),
        Err(e) => {
            warn!("Credential lookup failed: {}", e);
            return rejection(StatusCode::INTERNAL_SERVER_ERROR, "E_INTERNAL");
        }
    };

    let limit = record.effective_rate_limit();
    if state
        .limiter
        .is_limited(&api_key, limit, state.security.rate_window_secs)
        .await
    {
        return rejection(StatusCode::TOO_MANY_REQUESTS, "E_LIMIT");
    }

    request.extensions_mut().insert(Clearance::scoped(&record));
    next.run(request).await
}

/// Looks up a scoped key through the cache accessor. A hit skips the
/// credential store entirely, which bounds revocation staleness at the
/// API-key TTL.
async fn resolve_api_key(
    state: &AppState,
    api_key: &str,
) -> melos_core::MelosResult<Option<ApiKeyRecord>> {
    let cache_key = keys::api_key(api_key);
    let ttl = state.cache.ttl().api_key;
    let credentials = Arc::clone(&state.credentials);
    let supplied = api_key.to_owned();

    state
        .cache
        .read_through(&cache_key, ttl, move || async move {
            credentials.find_api_key(&supplied).await
        })
        .await
}

/// Pulls a session token from the bearer header or the `token` cookie.
fn extract_session_token(request: &Request<Body>) -> Option<String> {
    if let Some(token) = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        return Some(token.to_owned());
    }

    CookieJar::from_headers(request.headers())
        .get(TOKEN_COOKIE)
        .map(|c| c.value().to_owned())
}

/// Routes that bypass the gate entirely.
fn is_public_path(path: &str) -> bool {
    matches!(path, "/" | "/health" | "/docs") || path.starts_with("/docs/")
}

/// Whether a session token alone grants access: read-only, own data only.
fn is_session_scope(path: &str, method: &Method) -> bool {
    path.starts_with("/users/me") && method == Method::GET
}

fn is_mutating(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::DELETE | Method::PATCH
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        assert!(is_public_path("/"));
        assert!(is_public_path("/health"));
        assert!(is_public_path("/docs"));
        assert!(is_public_path("/docs/openapi.json"));
        assert!(!is_public_path("/docsanything"));
        assert!(!is_public_path("/tracks"));
        assert!(!is_public_path("/users/me"));
    }

    #[test]
    fn test_session_scope_is_read_only() {
        assert!(is_session_scope("/users/me", &Method::GET));
        assert!(is_session_scope("/users/me/history", &Method::GET));
        assert!(!is_session_scope("/users/me", &Method::PUT));
        assert!(!is_session_scope("/tracks", &Method::GET));
    }

    #[test]
    fn test_mutating_methods() {
        assert!(is_mutating(&Method::POST));
        assert!(is_mutating(&Method::PUT));
        assert!(is_mutating(&Method::DELETE));
        assert!(is_mutating(&Method::PATCH));
        assert!(!is_mutating(&Method::GET));
        assert!(!is_mutating(&Method::HEAD));
    }
}
