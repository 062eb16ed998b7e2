use super::SpotifyClient;
use crate::{types::AlbumResponse, warning};

impl SpotifyClient {
    /// Returns the URL of the album's first (largest) image.
    ///
    /// Falls back to the default cover when the request fails or the album
    /// has no images; an artwork problem never fails an import.
    pub async fn get_album_cover_url(&self, album_id: &str) -> String {
        match self.request_album(album_id).await {
            Ok(album) => match album.images.into_iter().next() {
                Some(image) => image.url,
                None => self.default_cover_url.clone(),
            },
            Err(e) => {
                warning!("Error fetching album cover for {}: {}", album_id, e);
                self.default_cover_url.clone()
            }
        }
    }

    async fn request_album(&self, album_id: &str) -> crate::error::Result<AlbumResponse> {
        let token = self.access_token().await?;
        let api_url = format!(
            "{uri}/albums/{id}",
            uri = self.config.api_url,
            id = album_id
        );

        let album = self
            .http
            .get(&api_url)
            .bearer_auth(&token)
            .send()
            .await?
            .error_for_status()?
            .json::<AlbumResponse>()
            .await?;
        Ok(album)
    }
}
