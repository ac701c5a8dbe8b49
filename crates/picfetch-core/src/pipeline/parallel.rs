//! Run several candidate downloads at once.
//!
//! Keeps up to `max_concurrent` candidates in flight; when one finishes,
//! the next is started until the list is empty. Each candidate runs on the
//! blocking pool since curl transfers block the calling thread.

use anyhow::Result;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

use super::{process_candidate, DownloadOutcome};
use crate::extract::ImageCandidate;
use crate::fetch::{Fetcher, Transport};

/// Processes `candidates` with up to `max_concurrent` downloads in flight.
///
/// Outcomes are returned sorted by candidate index, matching the order the
/// sequential pipeline would have produced. A failing or panicking candidate
/// never cancels the others: a panic becomes [`DownloadOutcome::Panicked`]
/// for that candidate alone.
pub async fn download_parallel<T>(
    fetcher: Arc<Fetcher<T>>,
    candidates: Vec<ImageCandidate>,
    dest_dir: PathBuf,
    max_concurrent: usize,
) -> Result<Vec<(ImageCandidate, DownloadOutcome)>>
where
    T: Transport + Send + Sync + 'static,
{
    let max_concurrent = max_concurrent.max(1);
    let dest_dir = Arc::new(dest_dir);
    let mut pending = candidates.into_iter();
    let mut results = Vec::with_capacity(pending.len());
    let mut join_set = tokio::task::JoinSet::new();

    loop {
        while join_set.len() < max_concurrent {
            let Some(candidate) = pending.next() else {
                break;
            };
            let fetcher = Arc::clone(&fetcher);
            let dest_dir = Arc::clone(&dest_dir);
            join_set.spawn_blocking(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    process_candidate(&*fetcher, &candidate, &dest_dir)
                }))
                .unwrap_or_else(|payload| {
                    let msg = panic_message(payload.as_ref());
                    tracing::error!(index = candidate.index, "download worker panicked: {}", msg);
                    DownloadOutcome::Panicked(msg)
                });
                (candidate, outcome)
            });
        }

        // Panics are caught inside the task, so a join error here means the
        // runtime itself is shutting down.
        let Some(res) = join_set.join_next().await else {
            break;
        };
        results.push(res.map_err(|e| anyhow::anyhow!("download task join: {}", e))?);
    }

    results.sort_by_key(|(candidate, _)| candidate.index);
    Ok(results)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
