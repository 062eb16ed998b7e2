//! Playlist import orchestration.
//!
//! An import runs synchronously inside the calling request:
//!
//! 1. Validate the playlist link and extract the playlist id.
//! 2. Fetch the playlist from the catalog. Nothing is written on failure.
//! 3. Find or create the playlist row for the user.
//! 4. Find or create a song row per track, in catalog order. New songs get an
//!    ownership row and their album cover.
//! 5. Locate and fetch every track in the same order. A failing track is
//!    recorded in the report and the loop moves on.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    error::{Error, Result},
    info,
    management::CatalogStore,
    sources::{CatalogTrack, MediaFetcher, MediaLocator, MetadataSource},
    success,
    types::{Playlist, Song},
    warning,
};

pub const PLAYLIST_URL_PREFIX: &str = "https://open.spotify.com/playlist/";

/// Extracts the playlist id from a `https://open.spotify.com/playlist/<id>`
/// link, dropping any query string or fragment.
pub fn extract_playlist_id(link: &str) -> Result<String> {
    let invalid = || {
        Error::Validation(
            "Invalid Spotify playlist link. Please check if what you have is a valid playlist link."
                .to_string(),
        )
    };

    let rest = link.trim().strip_prefix(PLAYLIST_URL_PREFIX).ok_or_else(invalid)?;
    let id = rest.split(['?', '#']).next().unwrap_or_default();

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid());
    }
    Ok(id.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    Fetched(PathBuf),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ImportedTrack {
    pub song: Song,
    /// `true` if this import created the song row.
    pub created: bool,
    pub album_cover_url: Option<String>,
    pub outcome: TrackOutcome,
}

impl ImportedTrack {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, TrackOutcome::Fetched(_))
    }

    pub fn status_line(&self) -> String {
        if self.succeeded() {
            format!("Successfully fetched {} by {}", self.song.title, self.song.artist)
        } else {
            format!("Failed to fetch {} by {}", self.song.title, self.song.artist)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImportReport {
    pub playlist: Playlist,
    pub playlist_created: bool,
    pub tracks: Vec<ImportedTrack>,
}

impl ImportReport {
    pub fn fetched_count(&self) -> usize {
        self.tracks.iter().filter(|t| t.succeeded()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &ImportedTrack> {
        self.tracks.iter().filter(|t| !t.succeeded())
    }
}

pub struct Importer<M, L, F> {
    metadata: M,
    locator: L,
    fetcher: F,
    store: Arc<CatalogStore>,
    downloads_dir: PathBuf,
}

impl<M, L, F> Importer<M, L, F>
where
    M: MetadataSource,
    L: MediaLocator,
    F: MediaFetcher,
{
    pub fn new(
        metadata: M,
        locator: L,
        fetcher: F,
        store: Arc<CatalogStore>,
        downloads_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            metadata,
            locator,
            fetcher,
            store,
            downloads_dir: downloads_dir.into(),
        }
    }

    pub fn downloads_dir(&self) -> &Path {
        &self.downloads_dir
    }

    /// Imports the playlist behind `link` for `user_id`.
    ///
    /// # Errors
    ///
    /// - `Error::Validation` - the link is not a playlist link; nothing written
    /// - `Error::Upstream` - the catalog failed or returned no tracks; nothing written
    /// - `Error::Store` - the catalog database failed while upserting rows
    ///
    /// Per-track locate/fetch failures never fail the import, they show up as
    /// [`TrackOutcome::Failed`] in the report.
    pub async fn import(&self, user_id: i64, link: &str) -> Result<ImportReport> {
        let playlist_id = extract_playlist_id(link)?;
        info!("Fetching songs for playlist {}", playlist_id);

        let catalog = match self.metadata.fetch_playlist(&playlist_id).await {
            Ok(catalog) => catalog,
            Err(e) => {
                warning!("Error fetching playlist songs from Spotify: {}", e);
                return Err(e);
            }
        };

        if catalog.tracks.is_empty() {
            return Err(Error::Upstream(format!(
                "playlist \"{}\" has no tracks",
                catalog.name
            )));
        }

        let (playlist, playlist_created) =
            self.store.find_or_create_playlist(&catalog.name, user_id)?;

        let mut rows = Vec::with_capacity(catalog.tracks.len());
        for track in &catalog.tracks {
            rows.push(self.upsert_track(user_id, &playlist, track).await?);
        }

        let mut tracks = Vec::with_capacity(rows.len());
        for (song, created, album_cover_url) in rows {
            let outcome = self.acquire(&song).await;
            match &outcome {
                TrackOutcome::Fetched(_) => {
                    success!("Successfully fetched {} by {}", song.title, song.artist);
                }
                TrackOutcome::Failed(reason) => {
                    warning!("Failed to fetch {} by {}: {}", song.title, song.artist, reason);
                }
            }
            tracks.push(ImportedTrack {
                song,
                created,
                album_cover_url,
                outcome,
            });
        }

        Ok(ImportReport {
            playlist,
            playlist_created,
            tracks,
        })
    }

    async fn upsert_track(
        &self,
        user_id: i64,
        playlist: &Playlist,
        track: &CatalogTrack,
    ) -> Result<(Song, bool, Option<String>)> {
        let (mut song, created) =
            self.store
                .find_or_create_song(&track.title, &track.artist, playlist.id)?;

        if created {
            self.store.add_ownership(user_id, song.id)?;
            if let Some(album_id) = &track.album_id {
                let cover = self.metadata.fetch_album_cover_url(album_id).await;
                self.store.set_album_cover_url(song.id, &cover)?;
                song.album_cover_url = Some(cover);
            }
        }

        let cover = song.album_cover_url.clone();
        Ok((song, created, cover))
    }

    async fn acquire(&self, song: &Song) -> TrackOutcome {
        let dir = self.downloads_dir.as_path();

        let source = match self.locator.locate(&song.title, &song.artist, dir).await {
            Ok(source) => source,
            Err(e) => return TrackOutcome::Failed(e.to_string()),
        };

        if let Some(url) = source.remote_url() {
            if let Err(e) = self.store.set_source_url(song.id, url) {
                warning!("Cannot store source URL for {}: {}", song.title, e);
            }
        }

        match self
            .fetcher
            .fetch(&source, &song.title, &song.artist, dir)
            .await
        {
            Ok(path) => TrackOutcome::Fetched(path),
            Err(e) => TrackOutcome::Failed(e.to_string()),
        }
    }
}
