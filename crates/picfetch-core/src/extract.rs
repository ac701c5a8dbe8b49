//! Pattern-based image reference discovery over raw page text.
//!
//! No HTML parsing: anything in the body that looks like a path or URL
//! ending in an image extension is a candidate, including names that only
//! appear in prose. Candidates are resolved against the page URL but not
//! checked; the download step finds out which ones are real.

use once_cell::sync::Lazy;
use regex::bytes::Regex;

use crate::url_model::{normalize, NormalizedUrl, UrlError};

/// A path of URL-safe characters ending in an image extension. After an
/// explicit `http://` or `https://` any URL-safe character is accepted,
/// `=` and `&` included. Without a scheme those two only appear after `?`,
/// so an attribute like `src=1.jpg` yields `1.jpg`.
static IMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:https?://[a-z0-9_./,;:%+#=&?-]+|[a-z0-9_./,;:%+#-]+(?:\?[a-z0-9_./,;:%+#=&?-]*)?)\.(?:jpg|bmp|gif|png|svg|tiff)",
    )
    .expect("image pattern is valid")
});

/// A matched image reference, prior to being confirmed as a real image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    /// 1-based position among all candidates found on the page.
    pub index: usize,
    /// The text exactly as matched.
    pub raw: String,
    /// Resolved absolute URL, or why resolution failed. Failed candidates are
    /// still handed downstream so the failure is reported per item.
    pub url: Result<NormalizedUrl, UrlError>,
}

impl ImageCandidate {
    /// Resolved URL if available, otherwise the raw match; for reporting.
    pub fn display_url(&self) -> &str {
        match &self.url {
            Ok(url) => url.as_str(),
            Err(_) => &self.raw,
        }
    }
}

/// Scans one page body. Holds no state between scans: every call to
/// [`Extractor::candidates`] starts over from the top of the body.
#[derive(Debug, Clone, Copy)]
pub struct Extractor<'a> {
    page_url: &'a NormalizedUrl,
    body: &'a [u8],
}

impl<'a> Extractor<'a> {
    pub fn new(page_url: &'a NormalizedUrl, body: &'a [u8]) -> Self {
        Self { page_url, body }
    }

    /// Lazy iterator over candidates in document order, duplicates included.
    pub fn candidates(&self) -> Candidates<'a> {
        Candidates {
            page_url: self.page_url,
            matches: IMAGE_RE.find_iter(self.body),
            next_index: 1,
        }
    }

    /// Number of candidates on the page (used as the `N` in `i/N`).
    pub fn count(&self) -> usize {
        IMAGE_RE.find_iter(self.body).count()
    }
}

/// Iterator returned by [`Extractor::candidates`].
#[derive(Debug)]
pub struct Candidates<'a> {
    page_url: &'a NormalizedUrl,
    matches: regex::bytes::Matches<'static, 'a>,
    next_index: usize,
}

impl Iterator for Candidates<'_> {
    type Item = ImageCandidate;

    fn next(&mut self) -> Option<ImageCandidate> {
        let m = self.matches.next()?;
        let raw = String::from_utf8_lossy(m.as_bytes()).into_owned();
        let url = resolve(self.page_url, &raw);
        let index = self.next_index;
        self.next_index += 1;
        Some(ImageCandidate { index, raw, url })
    }
}

/// Convenience: collect all candidates of `body` found on `page_url`.
pub fn extract(page_url: &NormalizedUrl, body: &[u8]) -> Vec<ImageCandidate> {
    Extractor::new(page_url, body).candidates().collect()
}

/// A reference that starts with `/` or contains no `/` at all is relative to
/// the page; anything else is treated as an absolute URL (scheme optional).
pub fn resolve(page_url: &NormalizedUrl, raw: &str) -> Result<NormalizedUrl, UrlError> {
    if raw.starts_with('/') || !raw.contains('/') {
        page_url.join(raw)
    } else {
        normalize(raw)
    }
}
