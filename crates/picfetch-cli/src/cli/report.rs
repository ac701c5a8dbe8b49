//! Console lines for per-image outcomes.

use picfetch_core::extract::ImageCandidate;
use picfetch_core::pipeline::{DownloadOutcome, Summary};
use std::path::Path;

pub fn outcome_line(candidate: &ImageCandidate, total: usize, outcome: &DownloadOutcome) -> String {
    let url = candidate.display_url();
    let i = candidate.index;
    match outcome {
        DownloadOutcome::Saved(_) => format!("Downloaded image {i}/{total}, {url}"),
        DownloadOutcome::SkippedNotImage { .. } => {
            format!("Image {i}/{total}, {url}: Not an image file")
        }
        DownloadOutcome::FetchFailed(e) => format!("Image {i}/{total}, {url}: {e}"),
        DownloadOutcome::SaveFailed(e) => {
            format!("Image {i}/{total}, {url}: Error, unable to save image ({})", e.source)
        }
        DownloadOutcome::Panicked(msg) => {
            format!("Image {i}/{total}, {url}: Error, worker crashed ({msg})")
        }
    }
}

pub fn candidate_line(candidate: &ImageCandidate, total: usize) -> String {
    let i = candidate.index;
    match &candidate.url {
        Ok(url) => format!("{i}/{total} {} -> {url}", candidate.raw),
        Err(e) => format!("{i}/{total} {} -> unresolvable: {}", candidate.raw, e.reason),
    }
}

pub fn summary_line(summary: &Summary, dir: &Path) -> String {
    format!(
        "Saved {} of {} image(s) to {} ({} not images, {} failed)",
        summary.saved,
        summary.total(),
        dir.display(),
        summary.skipped,
        summary.failed()
    )
}
