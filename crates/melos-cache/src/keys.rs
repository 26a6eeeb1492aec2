//! Cache key generators for consistent key naming.
//!
//! Keys follow `<namespace>:<resource>:<selector>`. A resource's list entry
//! and its item entries are independent: the list embeds denormalized item
//! fields, so a write to one item must clear both its item key and the list
//! key.

use chrono::{Datelike, NaiveDate, Utc};

/// Namespace for resource entries.
const CACHE_PREFIX: &str = "cache";

/// Generates the canonical list key for a resource.
#[must_use]
pub fn list(resource: &str) -> String {
    format!("{}:{}:list", CACHE_PREFIX, resource)
}

/// Generates the canonical item key for a resource.
#[must_use]
pub fn item(resource: &str, id: &str) -> String {
    format!("{}:{}:{}", CACHE_PREFIX, resource, id)
}

/// Generates a list key qualified by a normalized free-text filter.
///
/// Filtered queries must never share the unqualified list key, otherwise a
/// filtered request could be answered with unfiltered results (or the other
/// way around).
#[must_use]
pub fn filtered_list(resource: &str, filter: &str) -> String {
    format!(
        "{}:{}:list:q:{}",
        CACHE_PREFIX,
        resource,
        normalize_filter(filter)
    )
}

/// Generates the key for the deterministic daily selection of a resource.
#[must_use]
pub fn daily_selection(resource: &str, seed: u32) -> String {
    format!("{}:{}:random:{}", CACHE_PREFIX, resource, seed)
}

/// Generates the key for a lyric sheet variant.
#[must_use]
pub fn lyrics(track_id: &str, variant: &str) -> String {
    format!("lyrics:{}:{}", track_id, variant.to_lowercase())
}

/// Generates the short-lived key for a scoped API-key record.
#[must_use]
pub fn api_key(raw_key: &str) -> String {
    format!("apikey:{}", raw_key)
}

/// Generates the rate counter key for a caller identity.
#[must_use]
pub fn rate_limit(identity: &str) -> String {
    format!("ratelimit:{}", identity)
}

/// Normalizes a free-text filter for use inside a cache key: trimmed,
/// lowercased, internal whitespace collapsed.
#[must_use]
pub fn normalize_filter(filter: &str) -> String {
    filter
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Rotating seed for deterministic "random of the day" ordering.
///
/// Derived from the UTC calendar day, never stored: every request within
/// the same day computes the same seed, so repeated requests share a cache
/// entry without coordination.
#[must_use]
pub fn daily_seed() -> u32 {
    seed_for(Utc::now().date_naive())
}

/// Seed for a specific calendar day.
#[must_use]
pub fn seed_for(date: NaiveDate) -> u32 {
    let value = i64::from(date.year()) * 1000 + i64::from(date.ordinal());
    value.rem_euclid(97) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_and_item_keys_are_independent() {
        assert_eq!(list("tracks"), "cache:tracks:list");
        assert_eq!(item("tracks", "42"), "cache:tracks:42");
        assert_ne!(list("tracks"), item("tracks", "list-lookalike"));
    }

    #[test]
    fn test_filtered_list_key_differs_from_plain_list() {
        let plain = list("tracks");
        let filtered = filtered_list("tracks", "Daft Punk");
        assert_ne!(plain, filtered);
        assert_eq!(filtered, "cache:tracks:list:q:daft punk");
    }

    #[test]
    fn test_normalize_filter() {
        assert_eq!(normalize_filter("  Daft   PUNK "), "daft punk");
        assert_eq!(normalize_filter(""), "");
    }

    #[test]
    fn test_lyrics_key() {
        assert_eq!(lyrics("t-1", "Original"), "lyrics:t-1:original");
    }

    #[test]
    fn test_api_key_and_rate_limit_keys() {
        assert_eq!(api_key("S1"), "apikey:S1");
        assert_eq!(rate_limit("S1"), "ratelimit:S1");
    }

    #[test]
    fn test_seed_is_stable_within_a_day() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
        let seed = seed_for(date);
        assert_eq!(seed, seed_for(date));
        assert!(seed < 97);
    }

    #[test]
    fn test_seed_rotates_across_days() {
        let a = seed_for(NaiveDate::from_ymd_opt(2026, 8, 27).unwrap());
        let b = seed_for(NaiveDate::from_ymd_opt(2026, 8, 28).unwrap());
        assert_ne!(a, b);
    }
}
