//! Track catalog controller.
//!
//! Reads go through the cache accessor; every write invalidates both the
//! item key and the list key, because list entries embed denormalized
//! track fields.

use crate::{
    responses::{created, no_content, ok, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use melos_cache::keys;
use melos_core::{LYRIC_VARIANTS, MelosError, Track, TrackInput};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Number of tracks served by the daily selection.
const DAILY_SELECTION_SIZE: usize = 10;

/// Creates the track router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tracks).post(create_track))
        .route("/random", get(random_tracks))
        .route(
            "/:id",
            get(get_track).put(update_track).delete(delete_track),
        )
}

/// List all ready tracks.
async fn list_tracks(State(state): State<AppState>) -> ApiResult<Vec<Track>> {
    let catalog = Arc::clone(&state.catalog);
    let tracks = state
        .cache
        .read_through(&keys::list("tracks"), state.cache.ttl().list, move || {
            async move { catalog.list_tracks().await }
        })
        .await?;

    ok(tracks)
}

/// Get a track by ID.
async fn get_track(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Track> {
    debug!("Get track request: {}", id);

    let catalog = Arc::clone(&state.catalog);
    let lookup_id = id.clone();
    // Absent rows surface as errors from the loader so "not found" is
    // never frozen into the cache.
    let track = state
        .cache
        .read_through(
            &keys::item("tracks", &id),
            state.cache.ttl().item,
            move || async move {
                catalog
                    .get_track(&lookup_id)
                    .await?
                    .ok_or_else(|| MelosError::not_found("track", lookup_id))
            },
        )
        .await?;

    ok(track)
}

/// Create a track.
async fn create_track(
    State(state): State<AppState>,
    Json(input): Json<TrackInput>,
) -> Result<(StatusCode, Json<Track>), AppError> {
    validate_input(&input)?;

    let id = Uuid::now_v7().to_string();
    state.catalog.create_track(&id, &input).await?;
    state.cache.invalidate_item("tracks", &id).await;

    let track = state
        .catalog
        .get_track(&id)
        .await?
        .ok_or_else(|| MelosError::internal("Created track not readable"))?;

    Ok(created(track))
}

/// Update a track.
async fn update_track(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<TrackInput>,
) -> ApiResult<Track> {
    validate_input(&input)?;

    if !state.catalog.update_track(&id, &input).await? {
        return Err(MelosError::not_found("track", id).into());
    }
    state.cache.invalidate_item("tracks", &id).await;

    let track = state
        .catalog
        .get_track(&id)
        .await?
        .ok_or_else(|| MelosError::not_found("track", id))?;

    ok(track)
}

/// Delete a track and its derived cache entries.
async fn delete_track(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    debug!("Delete track request: {}", id);

    if !state.catalog.delete_track(&id).await? {
        return Err(MelosError::not_found("track", id).into());
    }

    state.cache.invalidate_item("tracks", &id).await;
    for variant in LYRIC_VARIANTS {
        state
            .cache
            .invalidate_exact(&keys::lyrics(&id, variant))
            .await;
    }

    Ok(no_content())
}

/// Deterministic "random tracks of the day".
///
/// The ordering is a pure function of the daily seed, so every request in
/// the same UTC day shares one cache entry and one ordering.
async fn random_tracks(State(state): State<AppState>) -> ApiResult<Vec<Track>> {
    let seed = keys::daily_seed();
    let catalog = Arc::clone(&state.catalog);

    let tracks = state
        .cache
        .read_through(
            &keys::daily_selection("tracks", seed),
            state.cache.ttl().volatile,
            move || async move {
                let mut tracks = catalog.list_tracks().await?;
                tracks.sort_by_key(|t| selection_rank(&t.id, seed));
                tracks.truncate(DAILY_SELECTION_SIZE);
                Ok(tracks)
            },
        )
        .await?;

    ok(tracks)
}

/// FNV-style mix of a track id and the daily seed. Stable within a day,
/// reshuffled the next.
fn selection_rank(id: &str, seed: u32) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325_u64 ^ u64::from(seed);
    for byte in id.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

fn validate_input(input: &TrackInput) -> Result<(), AppError> {
    if input.title.trim().is_empty() {
        return Err(MelosError::validation("Track title must not be empty").into());
    }
    if input.artist_id.trim().is_empty() {
        return Err(MelosError::validation("Track artist_id must not be empty").into());
    }
    Ok(())
}
