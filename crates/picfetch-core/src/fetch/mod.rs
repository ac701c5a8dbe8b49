//! HTTP GET with bounded, hand-rolled redirect following.
//!
//! A [`Transport`] performs exactly one round trip. [`Fetcher`] classifies
//! each response and re-enters itself for 3xx responses until it sees a
//! success, an error, or the hop budget runs out.

mod transport;
mod error;
mod parse;

pub use transport::CurlTransport;
pub use error::FetchError;
pub use parse::Headers;

use std::time::Duration;

use url::{ParseError, Url};

use crate::config::PicfetchConfig;
use crate::url_model::{normalize, NormalizedUrl, UrlError};

/// Default number of redirects a fetch may follow.
pub const DEFAULT_HOP_BUDGET: u32 = 10;

/// Coarse classification of an HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Redirect,
    Error,
}

impl StatusClass {
    pub fn of(status: u32) -> Self {
        match status {
            200..=299 => StatusClass::Success,
            300..=399 => StatusClass::Redirect,
            _ => StatusClass::Error,
        }
    }
}

/// One HTTP response, owned by whoever issued the request.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u32,
    pub headers: Headers,
    pub body: Vec<u8>,
    /// `Location` target; only set for redirect responses.
    pub location: Option<String>,
}

impl FetchResult {
    /// Builds a response, deriving `location` from the headers when the
    /// status is a redirect.
    pub fn new(status: u32, headers: Headers, body: Vec<u8>) -> Self {
        let location = match StatusClass::of(status) {
            StatusClass::Redirect => headers.get("location").map(str::to_string),
            _ => None,
        };
        Self {
            status,
            headers,
            body,
            location,
        }
    }

    pub fn class(&self) -> StatusClass {
        StatusClass::of(self.status)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type")
    }
}

/// Client settings shared by every request of a run.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_redirects: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from(&PicfetchConfig::default())
    }
}

impl From<&PicfetchConfig> for FetchOptions {
    fn from(cfg: &PicfetchConfig) -> Self {
        Self {
            user_agent: cfg.user_agent.clone(),
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.timeout_secs),
            max_redirects: cfg.max_redirects,
        }
    }
}

/// A single HTTP GET round trip. Implementations must not follow redirects.
pub trait Transport {
    fn get(&self, url: &NormalizedUrl) -> Result<FetchResult, FetchError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &NormalizedUrl) -> Result<FetchResult, FetchError> {
        (**self).get(url)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn get(&self, url: &NormalizedUrl) -> Result<FetchResult, FetchError> {
        (**self).get(url)
    }
}

/// Follows redirects on top of a [`Transport`].
#[derive(Debug, Clone)]
pub struct Fetcher<T = CurlTransport> {
    transport: T,
    hop_budget: u32,
}

impl Fetcher<CurlTransport> {
    /// Fetcher backed by libcurl, configured from `options`.
    pub fn with_options(options: FetchOptions) -> Self {
        let hop_budget = options.max_redirects;
        Self::new(CurlTransport::new(options), hop_budget)
    }
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, hop_budget: u32) -> Self {
        Self {
            transport,
            hop_budget,
        }
    }

    pub fn hop_budget(&self) -> u32 {
        self.hop_budget
    }

    /// Fetches `url` with the configured hop budget.
    pub fn fetch(&self, url: &NormalizedUrl) -> Result<FetchResult, FetchError> {
        self.fetch_with_budget(url, self.hop_budget)
    }

    /// Fetches `url`, following at most `hop_budget - 1` redirects.
    ///
    /// A budget of zero fails before any request is made.
    pub fn fetch_with_budget(
        &self,
        url: &NormalizedUrl,
        hop_budget: u32,
    ) -> Result<FetchResult, FetchError> {
        self.follow(url, hop_budget, 0)
    }

    fn follow(
        &self,
        url: &NormalizedUrl,
        hop_budget: u32,
        hops: u32,
    ) -> Result<FetchResult, FetchError> {
        if hop_budget == 0 {
            return Err(FetchError::TooManyRedirects {
                url: url.to_string(),
                hops,
            });
        }

        let response = self.transport.get(url)?;
        tracing::debug!(url = %url, status = response.status, hop_budget, "GET");

        match (response.class(), response.location.as_deref()) {
            (StatusClass::Success, _) => Ok(response),
            (StatusClass::Redirect, Some(location)) => {
                let next = redirect_target(url, location)?;
                tracing::debug!(from = %url, to = %next, "following redirect");
                self.follow(&next, hop_budget - 1, hops + 1)
            }
            _ => Err(FetchError::ServerError {
                url: url.to_string(),
                status: response.status,
            }),
        }
    }
}

/// Resolves a `Location` header value. Values that parse on their own go
/// through the normalizer; relative ones are joined onto the URL that
/// redirected, even when their query carries another URL.
fn redirect_target(current: &NormalizedUrl, location: &str) -> Result<NormalizedUrl, UrlError> {
    let location = location.trim();
    match Url::parse(location) {
        Err(ParseError::RelativeUrlWithoutBase) => current.join(location),
        _ => normalize(location),
    }
}
