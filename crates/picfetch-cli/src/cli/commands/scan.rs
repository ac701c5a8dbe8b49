//! `picfetch scan <url>` – list image references without downloading.

use anyhow::Result;
use picfetch_core::config::PicfetchConfig;
use picfetch_core::fetch::{FetchOptions, Fetcher};
use std::sync::Arc;

use crate::cli::report;

pub async fn run_scan(cfg: &PicfetchConfig, url: &str) -> Result<()> {
    let fetcher = Arc::new(Fetcher::with_options(FetchOptions::from(cfg)));
    let page = super::load_page(&fetcher, url).await?;

    let extractor = page.extractor();
    let total = extractor.count();
    println!("Found {} image reference(s) on {}", total, page.url);
    for candidate in extractor.candidates() {
        println!("{}", report::candidate_line(&candidate, total));
    }
    Ok(())
}
