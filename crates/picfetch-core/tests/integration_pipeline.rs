//! Integration test: page fetch, image discovery and download end to end
//! against a local server.

mod common;

use std::sync::Arc;

use common::page_server::{Reply, Site};
use picfetch_core::fetch::{FetchError, FetchOptions, Fetcher};
use picfetch_core::pipeline::{self, DownloadOutcome, Summary};
use picfetch_core::storage;
use tempfile::tempdir;

const PAGE: &str = r#"<html><body>
<img src="/img/a.png"> <img src=c.gif>
<a href="{base}/img/b.png">b</a>
Old screenshot: /missing.png
<img src='/fake.jpg'> /old/e.png
</body></html>"#;

fn gallery() -> String {
    Site::new()
        .route("/gallery/index", Reply::ok("text/html", PAGE))
        .route("/img/a.png", Reply::ok("image/png", "a-bytes"))
        .route("/gallery/c.gif", Reply::ok("image/gif", "c-bytes"))
        .route("/img/b.png", Reply::ok("image/png", "b-bytes"))
        .route("/fake.jpg", Reply::ok("text/html", "<html>404</html>"))
        .route("/old/e.png", Reply::redirect("/img/new.png"))
        .route("/img/new.png", Reply::ok("image/png", "new-bytes"))
        .start()
}

fn check_outcomes(results: &[(picfetch_core::extract::ImageCandidate, DownloadOutcome)], dir: &std::path::Path) {
    let order: Vec<usize> = results.iter().map(|(c, _)| c.index).collect();
    assert_eq!(order, [1, 2, 3, 4, 5, 6]);

    let mut summary = Summary::default();
    for (_, outcome) in results {
        summary.record(outcome);
    }
    assert_eq!(summary.saved, 4);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.fetch_failed, 1);
    assert_eq!(summary.save_failed, 0);

    assert!(matches!(
        results[3].1,
        DownloadOutcome::FetchFailed(FetchError::ServerError { status: 404, .. })
    ));
    assert!(matches!(
        results[4].1,
        DownloadOutcome::SkippedNotImage { .. }
    ));

    assert_eq!(std::fs::read(dir.join("a.png")).unwrap(), b"a-bytes");
    assert_eq!(std::fs::read(dir.join("c.gif")).unwrap(), b"c-bytes");
    assert_eq!(std::fs::read(dir.join("b.png")).unwrap(), b"b-bytes");
    // Named after the referenced URL, not the redirect target.
    assert_eq!(std::fs::read(dir.join("e.png")).unwrap(), b"new-bytes");
    assert!(!dir.join("fake.jpg").exists());
    assert!(!dir.join("missing.png").exists());
}

#[test]
fn sequential_run_downloads_real_images_only() {
    let base = gallery();
    let fetcher = Fetcher::with_options(FetchOptions::default());
    let page = pipeline::load_page(&fetcher, &format!("{base}/gallery/index")).expect("page");

    let extractor = page.extractor();
    assert_eq!(extractor.count(), 6);

    let out = tempdir().unwrap();
    let dir = storage::create_output_dir(out.path(), &page.url).unwrap();
    let results: Vec<_> = pipeline::download(&fetcher, extractor.candidates(), &dir).collect();
    check_outcomes(&results, &dir);
}

#[tokio::test]
async fn parallel_run_matches_sequential() {
    let base = gallery();
    let fetcher = Arc::new(Fetcher::with_options(FetchOptions::default()));
    let page = {
        let fetcher = Arc::clone(&fetcher);
        let input = format!("{base}/gallery/index");
        tokio::task::spawn_blocking(move || pipeline::load_page(&*fetcher, &input))
            .await
            .unwrap()
            .expect("page")
    };

    let candidates: Vec<_> = page.extractor().candidates().collect();
    let out = tempdir().unwrap();
    let results = pipeline::download_parallel(fetcher, candidates, out.path().to_path_buf(), 4)
        .await
        .unwrap();
    check_outcomes(&results, out.path());
}

#[test]
fn unreachable_page_is_fatal() {
    let base = Site::new().start();
    let fetcher = Fetcher::with_options(FetchOptions::default());
    let err = pipeline::load_page(&fetcher, &format!("{base}/nothing-here")).unwrap_err();
    assert!(matches!(
        err,
        pipeline::PageError::Fetch(FetchError::ServerError { status: 404, .. })
    ));
}
