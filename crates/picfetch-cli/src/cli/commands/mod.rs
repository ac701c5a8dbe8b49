//! CLI command handlers. Each command is in its own file.

mod grab;
mod scan;

pub use grab::run_grab;
pub use scan::run_scan;

use anyhow::{Context, Result};
use picfetch_core::fetch::Fetcher;
use picfetch_core::pipeline::{self, PageContext};
use std::sync::Arc;

/// Loads the page on the blocking pool. Any failure here ends the run.
async fn load_page(fetcher: &Arc<Fetcher>, url: &str) -> Result<PageContext> {
    let fetcher = Arc::clone(fetcher);
    let url = url.to_string();
    let page = tokio::task::spawn_blocking(move || pipeline::load_page(&*fetcher, &url))
        .await
        .context("page task join")??;
    Ok(page)
}
