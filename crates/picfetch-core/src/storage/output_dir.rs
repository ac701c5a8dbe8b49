//! Per-run output directory: `<host>_<YYYYmmdd_HHMMSS>`.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use std::fs;
use std::path::{Path, PathBuf};

use crate::url_model::NormalizedUrl;

/// Directory name for a run against `host` started at `started`.
///
/// Non-word characters and digits are stripped from the host, so
/// `www.example.com` becomes `wwwexamplecom`.
pub fn output_dir_name<Tz: TimeZone>(host: &str, started: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let clean_host: String = host
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == '_')
        .collect();
    format!("{}_{}", clean_host, started.format("%Y%m%d_%H%M%S"))
}

/// Creates (if missing) the output directory for `page_url` under `base`.
pub fn create_output_dir(base: &Path, page_url: &NormalizedUrl) -> Result<PathBuf> {
    let dir = base.join(output_dir_name(page_url.host(), &Local::now()));
    fs::create_dir_all(&dir)
        .with_context(|| format!("unable to create directory {}", dir.display()))?;
    tracing::info!(dir = %dir.display(), "output directory ready");
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url_model::normalize;
    use chrono::Utc;

    #[test]
    fn name_strips_punctuation_and_digits() {
        let t = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            output_dir_name("en.wikipedia.org", &t),
            "enwikipediaorg_20240309_070501"
        );
        assert_eq!(output_dir_name("127.0.0.1", &t), "_20240309_070501");
        assert_eq!(output_dir_name("my_host-1.test", &t), "my_hosttest_20240309_070501");
    }

    #[test]
    fn create_output_dir_makes_directory() {
        let base = tempfile::tempdir().unwrap();
        let url = normalize("http://site.test/page").unwrap();
        let dir = create_output_dir(base.path(), &url).unwrap();
        assert!(dir.is_dir());
        assert!(dir.starts_with(base.path()));
        let name = dir.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("sitetest_"), "{name}");
    }
}
