//! Store traits consumed by the gate and the resource handlers.

use async_trait::async_trait;
use melos_core::{ApiKeyRecord, LyricSheet, MelosResult, Track, TrackInput, User};

/// Read-only credential lookups for the authorization gate.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Looks up an active API key by its stored hash. Returns zero or one
    /// record; inactive keys read as absent.
    async fn find_api_key(&self, key_hash: &str) -> MelosResult<Option<ApiKeyRecord>>;

    /// Looks up a user by primary key (session-token paths).
    async fn find_user(&self, id: &str) -> MelosResult<Option<User>>;
}

/// Catalog reads and writes behind the resource handlers.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_tracks(&self) -> MelosResult<Vec<Track>>;

    async fn get_track(&self, id: &str) -> MelosResult<Option<Track>>;

    async fn create_track(&self, id: &str, input: &TrackInput) -> MelosResult<()>;

    /// Returns `false` when no row matched.
    async fn update_track(&self, id: &str, input: &TrackInput) -> MelosResult<bool>;

    /// Returns `false` when no row matched.
    async fn delete_track(&self, id: &str) -> MelosResult<bool>;

    /// Free-text title/artist search.
    async fn search_tracks(&self, term: &str) -> MelosResult<Vec<Track>>;

    async fn get_lyrics(&self, track_id: &str, variant: &str) -> MelosResult<Option<LyricSheet>>;

    async fn upsert_lyrics(&self, sheet: &LyricSheet) -> MelosResult<()>;

    /// Returns `false` when no row matched.
    async fn delete_lyrics(&self, track_id: &str, variant: &str) -> MelosResult<bool>;
}
