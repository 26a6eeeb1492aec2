//! Track catalog records.

use serde::{Deserialize, Serialize};

/// A catalog track with its denormalized artist name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    pub id: String,
    pub title: String,
    /// Denormalized artist name joined at query time. This is why a track
    /// write must invalidate the list entry as well as the item entry.
    pub artist: String,
    pub audio_url: Option<String>,
    pub cover_url: Option<String>,
    /// Duration in seconds.
    pub duration: Option<i64>,
    pub status: TrackStatus,
}

/// Processing status of a track.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrackStatus {
    Pending,
    Ready,
    Failed,
}

impl TrackStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

impl std::str::FromStr for TrackStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "ready" => Ok(Self::Ready),
            "failed" => Ok(Self::Failed),
            _ => Err(()),
        }
    }
}

/// Fields accepted when creating or updating a track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackInput {
    pub title: String,
    pub artist_id: String,
    pub audio_url: Option<String>,
    pub cover_url: Option<String>,
    pub duration: Option<i64>,
    #[serde(default)]
    pub status: Option<TrackStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for s in ["pending", "ready", "failed"] {
            let status: TrackStatus = s.parse().unwrap();
            assert_eq!(status.as_str(), s);
        }
        assert!("bogus".parse::<TrackStatus>().is_err());
    }
}
