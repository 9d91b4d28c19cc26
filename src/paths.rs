// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Base-URL joining for sub-path hosting.
//!
//! A site served from `https://example.com/blog/` needs every fetched resource
//! and every result link prefixed with `/blog`. Site generators are not
//! consistent about trailing slashes on the base or leading slashes on paths,
//! so the join has to be idempotent: exactly one separator between prefix and
//! path, whatever either side brings.

/// Join a base URL and a path with exactly one `/` between them.
///
/// - empty base returns the path unchanged
/// - empty path returns the base unchanged
/// - absolute URLs (`scheme://...`) and protocol-relative paths are returned as-is
///
/// ```
/// use sitefind::paths::join_path;
///
/// assert_eq!(join_path("/blog/", "/search.bin"), "/blog/search.bin");
/// assert_eq!(join_path("/blog", "search.bin"), "/blog/search.bin");
/// assert_eq!(join_path("", "/search.bin"), "/search.bin");
/// ```
pub fn join_path(base: &str, path: &str) -> String {
    if base.is_empty() || is_absolute_url(path) {
        return path.to_string();
    }
    if path.is_empty() {
        return base.to_string();
    }

    let head = base.trim_end_matches('/');
    let tail = path.trim_start_matches('/');

    let mut joined = String::with_capacity(head.len() + tail.len() + 1);
    joined.push_str(head);
    joined.push('/');
    joined.push_str(tail);
    joined
}

/// True for `scheme://host/...` and `//host/...`.
pub fn is_absolute_url(path: &str) -> bool {
    if path.starts_with("//") {
        return true;
    }
    match path.find("://") {
        Some(idx) if idx > 0 => path[..idx]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        _ => false,
    }
}
