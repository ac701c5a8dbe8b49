//! Download pipeline: fetch each candidate, keep the ones that are images.
//!
//! Failures here are item-level. They become a [`DownloadOutcome`] for that
//! candidate and never stop the batch. Page-level failures live in
//! [`page`] and are returned as errors instead.

mod page;
mod parallel;

pub use page::{load_page, PageContext, PageError};
pub use parallel::download_parallel;

use std::path::{Path, PathBuf};

use crate::extract::ImageCandidate;
use crate::fetch::{FetchError, Fetcher, Transport};
use crate::storage::{self, StorageError};
use crate::url_model::filename_from_url;

/// What happened to one candidate.
#[derive(Debug)]
pub enum DownloadOutcome {
    /// Image written to this path.
    Saved(PathBuf),
    /// Fetched fine, but the server did not call it an image.
    SkippedNotImage { content_type: Option<String> },
    /// Resolution or fetch failed.
    FetchFailed(FetchError),
    /// Fetched an image but could not write it.
    SaveFailed(StorageError),
    /// The worker handling this candidate panicked; carries the panic message.
    Panicked(String),
}

impl DownloadOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, DownloadOutcome::Saved(_))
    }
}

/// True when a `Content-Type` value declares an image.
pub fn is_image_content_type(value: &str) -> bool {
    value
        .trim_start()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

/// Fetches one candidate and saves it under `dest_dir` if it is an image.
pub fn process_candidate<T: Transport>(
    fetcher: &Fetcher<T>,
    candidate: &ImageCandidate,
    dest_dir: &Path,
) -> DownloadOutcome {
    let url = match &candidate.url {
        Ok(url) => url,
        Err(e) => return DownloadOutcome::FetchFailed(FetchError::InvalidUrl(e.clone())),
    };

    let response = match fetcher.fetch(url) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(index = candidate.index, url = %url, "fetch failed: {}", e);
            return DownloadOutcome::FetchFailed(e);
        }
    };

    let content_type = response.content_type().map(str::to_string);
    if !content_type.as_deref().is_some_and(is_image_content_type) {
        tracing::debug!(index = candidate.index, url = %url, ?content_type, "not an image");
        return DownloadOutcome::SkippedNotImage { content_type };
    }

    let filename = filename_from_url(url);
    match storage::save(dest_dir, &filename, &response.body, candidate.index) {
        Ok(path) => {
            tracing::info!(index = candidate.index, url = %url, path = %path.display(), "image saved");
            DownloadOutcome::Saved(path)
        }
        Err(e) => {
            tracing::warn!(index = candidate.index, url = %url, "save failed: {}", e);
            DownloadOutcome::SaveFailed(e)
        }
    }
}

/// Sequentially processes `candidates`, yielding outcomes in input order.
///
/// Lazy: each candidate is fetched only when the iterator is advanced.
pub fn download<'a, T, I>(
    fetcher: &'a Fetcher<T>,
    candidates: I,
    dest_dir: &'a Path,
) -> impl Iterator<Item = (ImageCandidate, DownloadOutcome)> + 'a
where
    T: Transport,
    I: IntoIterator<Item = ImageCandidate>,
    I::IntoIter: 'a,
{
    candidates.into_iter().map(move |candidate| {
        let outcome = process_candidate(fetcher, &candidate, dest_dir);
        (candidate, outcome)
    })
}

/// Per-kind outcome counts for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub saved: usize,
    pub skipped: usize,
    pub fetch_failed: usize,
    pub save_failed: usize,
    pub panicked: usize,
}

impl Summary {
    pub fn record(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Saved(_) => self.saved += 1,
            DownloadOutcome::SkippedNotImage { .. } => self.skipped += 1,
            DownloadOutcome::FetchFailed(_) => self.fetch_failed += 1,
            DownloadOutcome::SaveFailed(_) => self.save_failed += 1,
            DownloadOutcome::Panicked(_) => self.panicked += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.saved + self.skipped + self.fetch_failed + self.save_failed + self.panicked
    }

    /// Candidates that neither saved nor were skipped as non-images.
    pub fn failed(&self) -> usize {
        self.fetch_failed + self.save_failed + self.panicked
    }
}
