//! Lyric sheets, cached per track and variant.

use serde::{Deserialize, Serialize};

/// Known lyric variants for a track. Used when clearing derived cache keys
/// after a lyric delete.
pub const LYRIC_VARIANTS: &[&str] = &["original", "romanized", "translated"];

/// A single lyric line, optionally timestamped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LyricLine {
    /// Offset from track start in milliseconds, when the sheet is synced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_ms: Option<i64>,
    pub text: String,
}

/// A full lyric sheet for one track variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LyricSheet {
    pub track_id: String,
    /// Variant name, e.g. "original" or "romanized".
    pub variant: String,
    pub synced: bool,
    pub lines: Vec<LyricLine>,
}

impl LyricSheet {
    /// Whether the sheet has any content worth caching.
    #[must_use]
    pub fn has_lines(&self) -> bool {
        !self.lines.is_empty()
    }
}
