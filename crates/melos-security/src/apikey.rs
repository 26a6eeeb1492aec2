//! API-key credential checks.

/// Compares a supplied credential against an expected one in constant time.
///
/// Length is checked first; only equal-length buffers are scanned, with the
/// divergence of every byte pair OR-accumulated so the scan never exits
/// early. A non-zero accumulator after the full pass means "not equal".
#[must_use]
pub fn constant_time_eq(supplied: &str, expected: &str) -> bool {
    let a = supplied.as_bytes();
    let b = expected.as_bytes();

    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for i in 0..a.len() {
        diff |= a[i] ^ b[i];
    }
    diff == 0
}

/// Checks a supplied key against the configured master credential.
///
/// `None` (no master key configured) never matches.
#[must_use]
pub fn is_master_key(supplied: &str, master: Option<&str>) -> bool {
    match master {
        Some(master) => constant_time_eq(supplied, master),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_strings_match() {
        assert!(constant_time_eq("M1", "M1"));
        assert!(constant_time_eq("", ""));
    }

    #[test]
    fn test_unequal_strings_do_not_match() {
        assert!(!constant_time_eq("M1", "M2"));
        assert!(!constant_time_eq("M1", "m1"));
    }

    #[test]
    fn test_length_mismatch_fails() {
        assert!(!constant_time_eq("M1", "M11"));
        assert!(!constant_time_eq("M11", "M1"));
        assert!(!constant_time_eq("", "x"));
    }

    #[test]
    fn test_missing_master_never_matches() {
        assert!(!is_master_key("anything", None));
        assert!(is_master_key("M1", Some("M1")));
        assert!(!is_master_key("M2", Some("M1")));
    }
}
