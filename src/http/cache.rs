//! HTTP cache validation module
//!
//! Provides `ETag` / `Last-Modified` generation and conditional request handling.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Generate `ETag` from file metadata
///
/// Combines modification time, size and a hash of the path. The value is only
/// meant to be stable for a given file within one process.
///
/// # Returns
/// Quoted `ETag` string, e.g., `"1700000000123-42-9f86d081884c7d65"`
pub fn generate_etag(modified: SystemTime, size: u64, path: &Path) -> String {
    let mut hasher = DefaultHasher::new();
    path.hash(&mut hasher);
    let millis = modified
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    format!("\"{millis}-{size}-{:x}\"", hasher.finish())
}

/// Format a timestamp as an HTTP date (`Last-Modified`)
pub fn format_http_date(time: SystemTime) -> String {
    httpdate::fmt_http_date(time)
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports:
/// - Single `ETag`: `"abc123"`
/// - Multiple `ETags`: `"abc123", "def456"`
/// - Weak validators: `W/"abc123"`
/// - Wildcard: `*`
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag.split(',').map(str::trim).any(|e| {
            e == "*" || e.strip_prefix("W/").unwrap_or(e) == etag
        })
    })
}

/// Check `If-Modified-Since` against the file modification time
///
/// HTTP dates have one second resolution, so the modification time is
/// truncated before comparing. An unparsable date never matches.
pub fn check_not_modified_since(if_modified_since: Option<&str>, modified: SystemTime) -> bool {
    let Some(value) = if_modified_since else {
        return false;
    };

    match httpdate::parse_http_date(value) {
        Ok(client_time) => truncate_to_seconds(modified) <= client_time,
        Err(_) => false,
    }
}

/// Decide whether a conditional request can be answered with 304
///
/// `If-None-Match` takes precedence: when present, `If-Modified-Since` is ignored.
pub fn is_not_modified(
    if_none_match: Option<&str>,
    if_modified_since: Option<&str>,
    etag: &str,
    modified: SystemTime,
) -> bool {
    if if_none_match.is_some() {
        return check_etag_match(if_none_match, etag);
    }
    check_not_modified_since(if_modified_since, modified)
}

fn truncate_to_seconds(time: SystemTime) -> SystemTime {
    let secs = time
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    UNIX_EPOCH + Duration::from_secs(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_generate_etag() {
        let etag = generate_etag(at(1_700_000_000), 42, Path::new("/srv/a.txt"));
        assert!(etag.starts_with("\"1700000000000-42-"));
        assert!(etag.ends_with('"'));
    }

    #[test]
    fn test_etag_consistency() {
        let path = Path::new("/srv/a.txt");
        assert_eq!(
            generate_etag(at(10), 3, path),
            generate_etag(at(10), 3, path)
        );
    }

    #[test]
    fn test_etag_difference() {
        let path = Path::new("/srv/a.txt");
        let base = generate_etag(at(10), 3, path);
        assert_ne!(base, generate_etag(at(11), 3, path));
        assert_ne!(base, generate_etag(at(10), 4, path));
        assert_ne!(base, generate_etag(at(10), 3, Path::new("/srv/b.txt")));
    }

    #[test]
    fn test_check_etag_match() {
        let etag = "\"abc123\"";
        assert!(check_etag_match(Some("\"abc123\""), etag));
        assert!(check_etag_match(Some("\"xyz\", \"abc123\""), etag));
        assert!(check_etag_match(Some("W/\"abc123\""), etag));
        assert!(check_etag_match(Some("*"), etag));
        assert!(!check_etag_match(Some("\"different\""), etag));
        assert!(!check_etag_match(None, etag));
    }

    #[test]
    fn test_if_modified_since() {
        let modified = at(1_700_000_000) + Duration::from_millis(750);
        let same_second = format_http_date(at(1_700_000_000));
        let earlier = format_http_date(at(1_699_999_999));

        assert!(check_not_modified_since(Some(&same_second), modified));
        assert!(!check_not_modified_since(Some(&earlier), modified));
        assert!(!check_not_modified_since(Some("yesterday"), modified));
        assert!(!check_not_modified_since(None, modified));
    }

    #[test]
    fn test_if_none_match_takes_precedence() {
        let modified = at(1_700_000_000);
        let date = format_http_date(modified);
        assert!(!is_not_modified(Some("\"other\""), Some(&date), "\"tag\"", modified));
        assert!(is_not_modified(Some("\"tag\""), None, "\"tag\"", modified));
        assert!(is_not_modified(None, Some(&date), "\"tag\"", modified));
        assert!(!is_not_modified(None, None, "\"tag\"", modified));
    }
}
