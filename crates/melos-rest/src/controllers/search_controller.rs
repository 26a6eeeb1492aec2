//! Free-text catalog search.

use crate::{
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use melos_cache::keys;
use melos_core::Track;
use serde::Deserialize;
use std::sync::Arc;

/// Creates the search router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(search))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

/// Search tracks by title or artist.
///
/// Results are cached only under the filter-qualified key with the
/// volatile TTL; the unqualified list key is never touched here. A blank
/// query short-circuits without a store round trip.
async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<Track>> {
    let term = keys::normalize_filter(&query.q);
    if term.is_empty() {
        return ok(Vec::new());
    }

    let catalog = Arc::clone(&state.catalog);
    let loader_term = term.clone();
    let tracks = state
        .cache
        .read_through(
            &keys::filtered_list("tracks", &term),
            state.cache.ttl().volatile,
            move || async move { catalog.search_tracks(&loader_term).await },
        )
        .await?;

    ok(tracks)
}
