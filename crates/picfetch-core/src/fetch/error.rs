//! Fetch error kinds, one per way a GET (and its redirects) can end badly.

use thiserror::Error;

use crate::url_model::UrlError;

/// Why a fetch did not produce a successful response. Never retried.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL, or a redirect target, could not be normalized.
    #[error(transparent)]
    InvalidUrl(#[from] UrlError),

    /// The hop budget ran out before a non-redirect response arrived.
    #[error("HTTP redirect too deep at {url} after {hops} redirect(s)")]
    TooManyRedirects { url: String, hops: u32 },

    /// DNS, connect, TLS, timeout or other transport-level failure.
    #[error("connection to {url} failed: {source}")]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// 4xx/5xx, or a 3xx without a `Location` header.
    #[error("{url} returned HTTP {status}")]
    ServerError { url: String, status: u32 },
}
