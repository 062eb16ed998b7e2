use super::SpotifyClient;
use crate::{
    error::{Error, Result},
    sources::{CatalogPlaylist, CatalogTrack},
    types::{PlaylistItem, PlaylistResponse, PlaylistTracks},
};

const PLAYLIST_FIELDS: &str = "name,tracks.items(track(name,artists(name),album(id))),tracks.next";

impl SpotifyClient {
    /// Retrieves a playlist and all of its tracks, following `tracks.next`
    /// until the last page.
    ///
    /// # Errors
    ///
    /// `Error::Upstream` on any HTTP failure, on a payload without a playlist
    /// name, or when a page cannot be decoded.
    pub async fn get_playlist(&self, playlist_id: &str) -> Result<CatalogPlaylist> {
        let token = self
            .access_token()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;

        let api_url = format!(
            "{uri}/playlists/{id}",
            uri = self.config.api_url,
            id = playlist_id
        );
        let res = self
            .http
            .get(&api_url)
            .query(&[("fields", PLAYLIST_FIELDS)])
            .bearer_auth(&token)
            .send()
            .await?
            .error_for_status()?;
        let playlist = res.json::<PlaylistResponse>().await?;

        let Some(name) = playlist.name else {
            return Err(Error::Upstream(
                "Playlist name not found in Spotify data.".to_string(),
            ));
        };

        let mut items: Vec<PlaylistItem> = Vec::new();
        let mut next = None;
        if let Some(tracks) = playlist.tracks {
            items.extend(tracks.items);
            next = tracks.next;
        }

        while let Some(page_url) = next {
            let page = self
                .http
                .get(&page_url)
                .bearer_auth(&token)
                .send()
                .await?
                .error_for_status()?
                .json::<PlaylistTracks>()
                .await?;
            items.extend(page.items);
            next = page.next;
        }

        Ok(CatalogPlaylist {
            name,
            tracks: collect_tracks(items),
        })
    }
}

/// Converts raw playlist items into catalog tracks, in playlist order.
///
/// Items without a track (removed or unavailable entries) are skipped and
/// multiple artists are joined with `", "`.
pub fn collect_tracks(items: Vec<PlaylistItem>) -> Vec<CatalogTrack> {
    items
        .into_iter()
        .filter_map(|item| item.track)
        .map(|track| CatalogTrack {
            title: track.name,
            artist: track
                .artists
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            album_id: track.album.and_then(|a| a.id),
        })
        .collect()
}
