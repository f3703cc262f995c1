//! HTTP cache control module
//!
//! Provides `ETag` generation and conditional request handling for static files.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Cache-Control value for static files; clients revalidate with the `ETag`
pub const STATIC_CACHE_CONTROL: &str = "public, max-age=0";

/// Generate `ETag` using fast hashing
///
/// Returns a quoted string, e.g. `"abc123def"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports a single `ETag`, a comma-separated list, weak validators
/// (`W/"abc"`), and the `*` wildcard. Returns true when the client copy is
/// current and a 304 should be sent.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag.split(',').map(str::trim).any(|e| {
            let e = e.strip_prefix("W/").unwrap_or(e);
            e == etag || e == "*"
        })
    })
}
