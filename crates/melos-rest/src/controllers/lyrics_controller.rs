//! Lyrics controller.
//!
//! Lyric sheets are cached per track and variant under their own derived
//! keys, so a write only clears the variant it touched.

use crate::{
    responses::{no_content, ok, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use melos_cache::keys;
use melos_core::{LyricLine, LyricSheet, MelosError, LYRIC_VARIANTS};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Creates the lyrics router, mounted under the tracks resource.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/:id/lyrics",
        get(get_lyrics).put(put_lyrics).delete(delete_lyrics),
    )
}

#[derive(Debug, Deserialize)]
struct VariantQuery {
    #[serde(default = "default_variant")]
    variant: String,
}

fn default_variant() -> String {
    "original".to_string()
}

#[derive(Debug, Deserialize)]
struct DeleteQuery {
    variant: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LyricsInput {
    #[serde(default = "default_variant")]
    variant: String,
    #[serde(default)]
    synced: bool,
    lines: Vec<LyricLine>,
}

/// Get the lyric sheet for a track variant.
async fn get_lyrics(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<VariantQuery>,
) -> ApiResult<LyricSheet> {
    let variant = normalize_variant(&query.variant)?;
    debug!("Get lyrics request: {} ({})", id, variant);

    let catalog = Arc::clone(&state.catalog);
    let track_id = id.clone();
    let loader_variant = variant.clone();
    let sheet = state
        .cache
        .read_through(
            &keys::lyrics(&id, &variant),
            state.cache.ttl().lyrics,
            move || async move {
                catalog
                    .get_lyrics(&track_id, &loader_variant)
                    .await?
                    .ok_or_else(|| MelosError::not_found("lyrics", track_id))
            },
        )
        .await?;

    ok(sheet)
}

/// Create or replace the lyric sheet for a track variant.
async fn put_lyrics(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<LyricsInput>,
) -> ApiResult<LyricSheet> {
    let variant = normalize_variant(&input.variant)?;

    let sheet = LyricSheet {
        track_id: id.clone(),
        variant: variant.clone(),
        synced: input.synced,
        lines: input.lines,
    };
    if !sheet.has_lines() {
        return Err(MelosError::validation("Lyric sheet must not be empty").into());
    }

    state.catalog.upsert_lyrics(&sheet).await?;
    state
        .cache
        .invalidate_exact(&keys::lyrics(&id, &variant))
        .await;

    ok(sheet)
}

/// Delete a variant (or all variants) of a track's lyrics.
///
/// The variant is optional here, unlike on reads: a request without one
/// clears every known variant.
async fn delete_lyrics(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, AppError> {
    let variants: Vec<String> = match query.variant {
        Some(variant) => vec![normalize_variant(&variant)?],
        None => LYRIC_VARIANTS.iter().map(|v| (*v).to_string()).collect(),
    };

    let mut deleted = false;
    for variant in &variants {
        deleted |= state.catalog.delete_lyrics(&id, variant).await?;
        state
            .cache
            .invalidate_exact(&keys::lyrics(&id, variant))
            .await;
    }

    if !deleted {
        return Err(MelosError::not_found("lyrics", id).into());
    }
    Ok(no_content())
}

/// Lowercases and checks a variant against the known set.
fn normalize_variant(variant: &str) -> Result<String, AppError> {
    let normalized = variant.trim().to_lowercase();
    if LYRIC_VARIANTS.contains(&normalized.as_str()) {
        Ok(normalized)
    } else {
        Err(MelosError::validation(format!("Unknown lyric variant: {}", variant)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_variant() {
        assert_eq!(normalize_variant("Original").unwrap(), "original");
        assert_eq!(normalize_variant(" romanized ").unwrap(), "romanized");
        assert!(normalize_variant("klingon").is_err());
    }
}
