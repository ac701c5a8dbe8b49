//! `picfetch grab <url>` – download every image a page references.

use anyhow::{Context, Result};
use picfetch_core::config::PicfetchConfig;
use picfetch_core::fetch::{FetchOptions, Fetcher};
use picfetch_core::pipeline::{self, Summary};
use picfetch_core::storage;
use std::path::Path;
use std::sync::Arc;

use crate::cli::report;

pub async fn run_grab(cfg: &PicfetchConfig, url: &str, out_dir: &Path, jobs: usize) -> Result<()> {
    let fetcher = Arc::new(Fetcher::with_options(FetchOptions::from(cfg)));
    let page = super::load_page(&fetcher, url).await?;

    let dir = storage::create_output_dir(out_dir, &page.url)
        .context("unable to create directory to save images to")?;
    let total = page.extractor().count();
    println!("Found {} image reference(s) on {}", total, page.url);

    let summary = if jobs > 1 {
        let candidates = page.extractor().candidates().collect();
        let results =
            pipeline::download_parallel(Arc::clone(&fetcher), candidates, dir.clone(), jobs).await?;
        let mut summary = Summary::default();
        for (candidate, outcome) in &results {
            println!("{}", report::outcome_line(candidate, total, outcome));
            summary.record(outcome);
        }
        summary
    } else {
        let fetcher = Arc::clone(&fetcher);
        let dir = dir.clone();
        tokio::task::spawn_blocking(move || {
            let mut summary = Summary::default();
            for (candidate, outcome) in
                pipeline::download(&*fetcher, page.extractor().candidates(), &dir)
            {
                println!("{}", report::outcome_line(&candidate, total, &outcome));
                summary.record(&outcome);
            }
            summary
        })
        .await
        .context("download task join")?
    };

    println!("{}", report::summary_line(&summary, &dir));
    tracing::info!(
        saved = summary.saved,
        skipped = summary.skipped,
        fetch_failed = summary.fetch_failed,
        save_failed = summary.save_failed,
        panicked = summary.panicked,
        "grab completed"
    );
    Ok(())
}
