//! libcurl-backed transport: one GET, redirects left to the caller.

use std::str;

use super::parse::parse_header_lines;
use super::{FetchError, FetchOptions, FetchResult, Transport};
use crate::url_model::NormalizedUrl;

/// Performs a single GET per call with a fresh easy handle.
///
/// Runs in the current thread; call from `spawn_blocking` if used from async code.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    options: FetchOptions,
}

impl CurlTransport {
    pub fn new(options: FetchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    fn perform(&self, url: &NormalizedUrl) -> Result<FetchResult, ::curl::Error> {
        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = ::curl::easy::Easy::new();
        easy.url(url.as_str())?;
        easy.get(true)?;
        easy.follow_location(false)?;
        easy.useragent(&self.options.user_agent)?;
        easy.connect_timeout(self.options.connect_timeout)?;
        easy.timeout(self.options.timeout)?;

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        Ok(FetchResult::new(status, parse_header_lines(&header_lines), body))
    }
}

impl Transport for CurlTransport {
    fn get(&self, url: &NormalizedUrl) -> Result<FetchResult, FetchError> {
        self.perform(url).map_err(|e| FetchError::ConnectionFailed {
            url: url.to_string(),
            source: Box::new(e),
        })
    }
}
