// src/utils/url.rs

//! URL-derived state keys.

use url::Url;

use crate::error::Result;

/// Derive a filesystem-safe slug from a resource URL.
///
/// The slug is the URL path with leading/trailing slashes stripped and
/// interior slashes replaced by underscores. An empty path falls back to
/// the host, so `https://example.com` and `https://example.com/` both
/// yield `example.com`.
///
/// # Examples
/// ```
/// use pagewatch::utils::url::slug_for;
///
/// assert_eq!(
///     slug_for("https://example.com/calendar/diary.htm").unwrap(),
///     "calendar_diary.htm"
/// );
/// ```
pub fn slug_for(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;

    let slug = parsed.path().trim_matches('/').replace('/', "_");
    if !slug.is_empty() {
        return Ok(slug);
    }

    Ok(parsed.host_str().unwrap_or_default().to_string())
}
