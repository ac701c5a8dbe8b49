//! Filename extraction from URL path.

use super::NormalizedUrl;

/// Filename used when the URL path has no usable last segment.
const DEFAULT_FILENAME: &str = "image.bin";

/// Returns the last path segment of `url` for use as a local filename.
///
/// No collision avoidance: two URLs ending in the same segment map to the
/// same name and the later save overwrites the earlier one.
pub fn filename_from_url(url: &NormalizedUrl) -> String {
    let segment = url
        .as_url()
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last());
    match segment {
        Some(s) if s != "." && s != ".." => s.to_string(),
        _ => DEFAULT_FILENAME.to_string(),
    }
}
