//! SQLite catalog store implementation.

use crate::pool::DatabasePool;
use crate::traits::CatalogStore;
use async_trait::async_trait;
use melos_core::{LyricLine, LyricSheet, MelosError, MelosResult, Track, TrackInput, TrackStatus};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// SQLite-backed catalog reads and writes.
#[derive(Clone)]
pub struct SqliteCatalogStore {
    pool: Arc<DatabasePool>,
}

impl SqliteCatalogStore {
    /// Creates a new catalog store over the shared pool.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TrackRow {
    id: String,
    title: String,
    artist: String,
    audio_url: Option<String>,
    cover_url: Option<String>,
    duration: Option<i64>,
    status: String,
}

impl From<TrackRow> for Track {
    fn from(row: TrackRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            artist: row.artist,
            audio_url: row.audio_url,
            cover_url: row.cover_url,
            duration: row.duration,
            status: row.status.parse().unwrap_or(TrackStatus::Pending),
        }
    }
}

#[derive(Debug, FromRow)]
struct LyricRow {
    track_id: String,
    variant: String,
    synced: bool,
    content: String,
}

impl TryFrom<LyricRow> for LyricSheet {
    type Error = MelosError;

    fn try_from(row: LyricRow) -> Result<Self, Self::Error> {
        let lines: Vec<LyricLine> = serde_json::from_str(&row.content)?;
        Ok(Self {
            track_id: row.track_id,
            variant: row.variant,
            synced: row.synced,
            lines,
        })
    }
}

const TRACK_SELECT: &str = "SELECT t.id, t.title, a.name AS artist, t.audio_url, \
     t.cover_url, t.duration, t.status \
     FROM tracks t JOIN artists a ON a.id = t.artist_id";

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn list_tracks(&self) -> MelosResult<Vec<Track>> {
        let rows: Vec<TrackRow> = sqlx::query_as(&format!(
            "{} WHERE t.status = 'ready' ORDER BY t.created_at DESC",
            TRACK_SELECT
        ))
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Track::from).collect())
    }

    async fn get_track(&self, id: &str) -> MelosResult<Option<Track>> {
        let row: Option<TrackRow> =
            sqlx::query_as(&format!("{} WHERE t.id = ?", TRACK_SELECT))
                .bind(id)
                .fetch_optional(self.pool.inner())
                .await?;

        Ok(row.map(Track::from))
    }

    async fn create_track(&self, id: &str, input: &TrackInput) -> MelosResult<()> {
        let status = input.status.unwrap_or(TrackStatus::Ready);
        sqlx::query(
            "INSERT INTO tracks (id, artist_id, title, audio_url, cover_url, duration, status, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)",
        )
        .bind(id)
        .bind(&input.artist_id)
        .bind(&input.title)
        .bind(&input.audio_url)
        .bind(&input.cover_url)
        .bind(input.duration)
        .bind(status.as_str())
        .execute(self.pool.inner())
        .await?;

        debug!("Created track {}", id);
        Ok(())
    }

    async fn update_track(&self, id: &str, input: &TrackInput) -> MelosResult<bool> {
        let status = input.status.unwrap_or(TrackStatus::Ready);
        let result = sqlx::query(
            "UPDATE tracks SET artist_id = ?, title = ?, audio_url = ?, cover_url = ?, \
             duration = ?, status = ? WHERE id = ?",
        )
        .bind(&input.artist_id)
        .bind(&input.title)
        .bind(&input.audio_url)
        .bind(&input.cover_url)
        .bind(input.duration)
        .bind(status.as_str())
        .bind(id)
        .execute(self.pool.inner())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_track(&self, id: &str) -> MelosResult<bool> {
        let result = sqlx::query("DELETE FROM tracks WHERE id = ?")
            .bind(id)
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn search_tracks(&self, term: &str) -> MelosResult<Vec<Track>> {
        let pattern = format!("%{}%", term);
        let rows: Vec<TrackRow> = sqlx::query_as(&format!(
            "{} WHERE t.status = 'ready' AND (t.title LIKE ? OR a.name LIKE ?) \
             ORDER BY t.title LIMIT 50",
            TRACK_SELECT
        ))
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Track::from).collect())
    }

    async fn get_lyrics(&self, track_id: &str, variant: &str) -> MelosResult<Option<LyricSheet>> {
        let row: Option<LyricRow> = sqlx::query_as(
            "SELECT track_id, variant, synced, content FROM lyrics \
             WHERE track_id = ? AND variant = ?",
        )
        .bind(track_id)
        .bind(variant)
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(LyricSheet::try_from).transpose()
    }

    async fn upsert_lyrics(&self, sheet: &LyricSheet) -> MelosResult<()> {
        let content = serde_json::to_string(&sheet.lines)?;
        sqlx::query(
            "INSERT INTO lyrics (track_id, variant, synced, content) VALUES (?, ?, ?, ?) \
             ON CONFLICT(track_id, variant) DO UPDATE SET synced = excluded.synced, \
             content = excluded.content",
        )
        .bind(&sheet.track_id)
        .bind(&sheet.variant)
        .bind(sheet.synced)
        .bind(&content)
        .execute(self.pool.inner())
        .await?;

        Ok(())
    }

    async fn delete_lyrics(&self, track_id: &str, variant: &str) -> MelosResult<bool> {
        let result = sqlx::query("DELETE FROM lyrics WHERE track_id = ? AND variant = ?")
            .bind(track_id)
            .bind(variant)
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
