//! Disk I/O and file lifecycle.
//!
//! Bodies are written to a temp file next to the destination and renamed
//! into place, so a failed write never leaves a truncated image under the
//! final name. Existing files are overwritten.

mod output_dir;

pub use output_dir::{create_output_dir, output_dir_name};

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Failure to persist a downloaded body.
#[derive(Debug, Error)]
#[error("unable to save {}: {source}", path.display())]
pub struct StorageError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Path for the temp file: `<final>.<tag>.part`. The tag keeps concurrent
/// writers of the same final name from sharing a temp file.
pub fn temp_path(final_path: &Path, tag: usize) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(format!(".{tag}{TEMP_SUFFIX}"));
    PathBuf::from(o)
}

/// Writes `body` to `dest_dir/filename`, replacing any existing file.
pub fn save(dest_dir: &Path, filename: &str, body: &[u8], tag: usize) -> Result<PathBuf, StorageError> {
    let final_path = dest_dir.join(filename);
    let tmp = temp_path(&final_path, tag);

    write_new(&tmp, body).map_err(|source| {
        let _ = std::fs::remove_file(&tmp);
        StorageError {
            path: final_path.clone(),
            source,
        }
    })?;

    std::fs::rename(&tmp, &final_path).map_err(|source| {
        let _ = std::fs::remove_file(&tmp);
        StorageError {
            path: final_path.clone(),
            source,
        }
    })?;

    tracing::debug!(path = %final_path.display(), bytes = body.len(), "saved");
    Ok(final_path)
}

fn write_new(path: &Path, body: &[u8]) -> io::Result<()> {
    let mut file = File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.write_all(body)?;
    file.sync_all()
}
