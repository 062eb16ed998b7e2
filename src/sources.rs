//! Seams between the importer and the external services.
//!
//! The importer is generic over these traits so the production clients
//! (Spotify, YouTube search, rusty_ytdl) can be swapped for in-process fakes.
//! The futures are `Send` because the import runs inside axum handlers.

use std::{
    future::Future,
    path::{Path, PathBuf},
};

use crate::error::Result;

/// A playlist as returned by the catalog, tracks in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPlaylist {
    pub name: String,
    pub tracks: Vec<CatalogTrack>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTrack {
    pub title: String,
    /// All artist names joined with `", "`.
    pub artist: String,
    pub album_id: Option<String>,
}

/// Where the audio for a track comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// The track is already in the downloads directory.
    Local(PathBuf),
    /// Canonical watch URL of the located video.
    Remote(String),
}

impl MediaSource {
    pub fn remote_url(&self) -> Option<&str> {
        match self {
            MediaSource::Remote(url) => Some(url),
            MediaSource::Local(_) => None,
        }
    }
}

pub trait MetadataSource: Send + Sync {
    /// Fetches the playlist name and its tracks.
    ///
    /// Fails with `Error::Upstream` when the API errors or the payload has no
    /// playlist name.
    fn fetch_playlist(&self, playlist_id: &str)
    -> impl Future<Output = Result<CatalogPlaylist>> + Send;

    /// Returns the album artwork URL, or the configured default cover on any
    /// failure. Never fails.
    fn fetch_album_cover_url(&self, album_id: &str) -> impl Future<Output = String> + Send;
}

pub trait MediaLocator: Send + Sync {
    /// Finds a source for `"{title} by {artist}"`, short-circuiting to the
    /// local file when it already exists in `dir`.
    fn locate(
        &self,
        title: &str,
        artist: &str,
        dir: &Path,
    ) -> impl Future<Output = Result<MediaSource>> + Send;
}

pub trait MediaFetcher: Send + Sync {
    /// Stores the audio for a track in `dir` and returns its path.
    ///
    /// Already present files and [`MediaSource::Local`] sources succeed
    /// without any network access.
    fn fetch(
        &self,
        source: &MediaSource,
        title: &str,
        artist: &str,
        dir: &Path,
    ) -> impl Future<Output = Result<PathBuf>> + Send;
}
