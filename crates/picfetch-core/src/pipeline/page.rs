//! Page-level stage: normalize and fetch the page the images come from.

use thiserror::Error;

use crate::extract::Extractor;
use crate::fetch::{FetchError, Fetcher, Transport};
use crate::url_model::{normalize, NormalizedUrl, UrlError};

/// Fatal errors: without the page there is nothing to extract from.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("bad page URL: {0}")]
    InvalidUrl(#[from] UrlError),
    #[error("cannot fetch page: {0}")]
    Fetch(#[from] FetchError),
}

/// The page a run works from. Read-only once loaded.
#[derive(Debug, Clone)]
pub struct PageContext {
    /// Normalized URL the user asked for; base for relative references.
    pub url: NormalizedUrl,
    pub body: Vec<u8>,
}

impl PageContext {
    pub fn extractor(&self) -> Extractor<'_> {
        Extractor::new(&self.url, &self.body)
    }
}

/// Normalizes `input` and fetches it.
///
/// Relative image references resolve against the URL as given, not the
/// target of any redirect the fetch followed.
pub fn load_page<T: Transport>(fetcher: &Fetcher<T>, input: &str) -> Result<PageContext, PageError> {
    let url = normalize(input)?;
    tracing::info!(url = %url, "fetching page");
    let response = fetcher.fetch(&url)?;
    tracing::debug!(url = %url, bytes = response.body.len(), "page fetched");
    Ok(PageContext {
        url,
        body: response.body,
    })
}
