//! Route path canonicalization.
//!
//! Every path that enters the route tree (router prefixes, controller paths,
//! handler fragments) goes through [`normalize_path`] so that composition and
//! comparison never depend on how the application author spelled a path.

/// Canonicalize a raw path.
///
/// The result always starts with a single `/`, never ends with `/` (except
/// for the root path itself) and contains no empty segments:
///
/// ```
/// use girder_core::path::normalize_path;
///
/// assert_eq!(normalize_path("items/"), "/items");
/// assert_eq!(normalize_path("//a//b/"), "/a/b");
/// assert_eq!(normalize_path(""), "/");
/// ```
///
/// The function is total and idempotent.
pub fn normalize_path(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len() + 1);
    for segment in raw.split('/').filter(|segment| !segment.is_empty()) {
        normalized.push('/');
        normalized.push_str(segment);
    }
    if normalized.is_empty() {
        normalized.push('/');
    }
    normalized
}

/// Join path segments into one canonical path.
///
/// Each segment is normalized on its own before joining, so a root segment
/// (`""` or `"/"`) contributes nothing:
///
/// ```
/// use girder_core::path::join_paths;
///
/// assert_eq!(join_paths(["/api/", "items", "/"]), "/api/items");
/// assert_eq!(join_paths(["/", ""]), "/");
/// ```
pub fn join_paths<I>(segments: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut joined = String::new();
    for segment in segments {
        let normalized = normalize_path(segment.as_ref());
        if normalized != "/" {
            joined.push_str(&normalized);
        }
    }
    if joined.is_empty() {
        joined.push('/');
    }
    joined
}
