//! # Spotify Integration Module
//!
//! Catalog metadata for the importer: playlist name and tracks, and album
//! artwork. Uses the client-credentials flow, so no user authorization is
//! involved; the token is cached in a [`TokenManager`] and renewed shortly
//! before it expires.
//!
//! ## API Coverage
//!
//! - `POST /api/token` - Client-credentials token
//! - `GET /playlists/{id}` - Playlist name and first page of tracks
//! - `GET {tracks.next}` - Following pages of playlist tracks
//! - `GET /albums/{id}` - Album images
//!
//! Every request is attempted once. Failures surface as
//! [`crate::error::Error::Upstream`], except album artwork which falls back to
//! the configured default cover.

mod album;
mod auth;
mod playlist;

use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    config::SpotifyConfig,
    error::Result,
    management::TokenManager,
    sources::{CatalogPlaylist, MetadataSource},
};

pub use playlist::collect_tracks;

pub struct SpotifyClient {
    http: Client,
    config: SpotifyConfig,
    tokens: Mutex<TokenManager>,
    default_cover_url: String,
}

impl SpotifyClient {
    pub fn new(config: SpotifyConfig, default_cover_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            config,
            tokens: Mutex::new(TokenManager::new()),
            default_cover_url: default_cover_url.into(),
        }
    }

    pub fn default_cover_url(&self) -> &str {
        &self.default_cover_url
    }
}

impl MetadataSource for SpotifyClient {
    async fn fetch_playlist(&self, playlist_id: &str) -> Result<CatalogPlaylist> {
        self.get_playlist(playlist_id).await
    }

    async fn fetch_album_cover_url(&self, album_id: &str) -> String {
        self.get_album_cover_url(album_id).await
    }
}
