//! Downloads directory layout.
//!
//! Every fetched track lives at `<downloads>/{title} by {artist}.mp3`. The
//! name is the only key the system has for "already downloaded", so existence
//! checks, fetches and archives all go through [`track_filename`].

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Builds the canonical file name for a track.
///
/// Rejects names that would escape the downloads directory.
pub fn track_filename(title: &str, artist: &str) -> Result<String> {
    for part in [title, artist] {
        if part.contains(['/', '\\', '\0']) {
            return Err(Error::Validation(format!(
                "\"{}\" cannot be used in a file name",
                part
            )));
        }
    }

    Ok(format!("{} by {}.mp3", title, artist))
}

pub fn track_path(dir: &Path, title: &str, artist: &str) -> Result<PathBuf> {
    Ok(dir.join(track_filename(title, artist)?))
}

/// Returns the local path of a track if it has already been downloaded.
pub async fn existing_track(dir: &Path, title: &str, artist: &str) -> Result<Option<PathBuf>> {
    let path = track_path(dir, title, artist)?;
    match async_fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => Ok(Some(path)),
        Ok(_) => Ok(None),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Io(e)),
    }
}

/// Creates the downloads directory if it does not exist yet.
pub async fn ensure_downloads_dir(dir: &Path) -> Result<PathBuf> {
    async_fs::create_dir_all(dir).await?;
    Ok(dir.to_path_buf())
}
