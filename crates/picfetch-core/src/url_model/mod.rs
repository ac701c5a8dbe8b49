//! URL modeling and filename derivation.
//!
//! Turns user-supplied or in-page strings into absolute `http`/`https` URLs
//! that always carry a host and a port, and derives local filenames from
//! resolved image URLs.

mod path;

pub use path::filename_from_url;

use std::fmt;
use thiserror::Error;
use url::Url;

/// Scheme prepended (once) to inputs that do not parse to a host and port.
const DEFAULT_SCHEME_PREFIX: &str = "http://";

/// Error produced when a string cannot be turned into a [`NormalizedUrl`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid URL {input:?}: {reason}")]
pub struct UrlError {
    /// The string that failed to normalize.
    pub input: String,
    /// Which parse stage rejected it and why.
    pub reason: String,
}

impl UrlError {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// An absolute URL guaranteed to have an `http`/`https` scheme, a non-empty
/// host, a resolvable port and a non-empty path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedUrl {
    url: Url,
    port: u16,
}

impl NormalizedUrl {
    /// Validates an already-parsed URL (e.g. the result of a join).
    pub fn from_url(url: Url) -> Result<Self, UrlError> {
        check(url).map_err(|(url, reason)| UrlError::new(url.as_str(), reason))
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn host(&self) -> &str {
        // Non-empty by construction.
        self.url.host_str().unwrap_or_default()
    }

    /// Explicit port, or the scheme's default.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Path component; `/` when the input had none.
    pub fn path(&self) -> &str {
        match self.url.path() {
            "" => "/",
            p => p,
        }
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.url
    }

    /// Resolves `reference` against this URL with standard URL-join semantics.
    pub fn join(&self, reference: &str) -> Result<NormalizedUrl, UrlError> {
        let joined = self
            .url
            .join(reference)
            .map_err(|e| UrlError::new(reference, format!("cannot join onto {}: {e}", self.url)))?;
        NormalizedUrl::from_url(joined)
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Normalizes a user-supplied or in-page string into an absolute URL.
///
/// The input is parsed once as-is. If that yields no host or no port, it is
/// re-parsed exactly once with `http://` prepended; no other scheme is tried.
///
/// # Examples
///
/// - `normalize("example.com/a/b")` → `http://example.com/a/b`
/// - `normalize("https://example.com")` → `https://example.com/`
pub fn normalize(input: &str) -> Result<NormalizedUrl, UrlError> {
    let first = match Url::parse(input) {
        Ok(url) => match check(url) {
            Ok(normalized) => return Ok(normalized),
            // Parsed with a host and port, but a scheme we do not fetch.
            Err((url, reason)) if has_host_and_port(&url) => {
                return Err(UrlError::new(input, reason));
            }
            Err((_, reason)) => reason,
        },
        Err(e) => e.to_string(),
    };

    let prefixed = format!("{DEFAULT_SCHEME_PREFIX}{input}");
    match Url::parse(&prefixed) {
        Ok(url) => check(url).map_err(|(_, reason)| {
            UrlError::new(input, format!("{reason} (also after {DEFAULT_SCHEME_PREFIX} prefix)"))
        }),
        Err(e) => Err(UrlError::new(
            input,
            format!("{first}; with {DEFAULT_SCHEME_PREFIX} prefix: {e}"),
        )),
    }
}

fn has_host_and_port(url: &Url) -> bool {
    url.host_str().is_some_and(|h| !h.is_empty()) && url.port_or_known_default().is_some()
}

fn check(url: Url) -> Result<NormalizedUrl, (Url, String)> {
    if !has_host_and_port(&url) {
        return Err((url, "no host or port".to_string()));
    }
    match url.scheme() {
        "http" | "https" => {}
        other => {
            let reason = format!("unsupported scheme {other:?}");
            return Err((url, reason));
        }
    }
    let port = match url.port_or_known_default() {
        Some(p) => p,
        None => return Err((url, "no port".to_string())),
    };
    Ok(NormalizedUrl { url, port })
}
