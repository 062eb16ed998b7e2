use std::path::Path;

use reqwest::Client;

use crate::{
    config::YouTubeConfig,
    error::{Error, Result},
    sources::{MediaLocator, MediaSource},
    storage,
    types::SearchListResponse,
};

/// Text query sent to the video index for a track.
pub fn search_query(title: &str, artist: &str) -> String {
    format!("{} by {} music video", title, artist)
}

pub struct YouTubeSearch {
    http: Client,
    config: YouTubeConfig,
}

impl YouTubeSearch {
    pub fn new(config: YouTubeConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Searches for one video matching `query` and returns its watch URL.
    ///
    /// # Errors
    ///
    /// - `Error::Upstream` - request failed or the response was not decodable
    /// - `Error::NotFound` - the index returned no video
    pub async fn search(&self, query: &str) -> Result<String> {
        let api_url = format!("{uri}/search", uri = self.config.api_url);
        let res = self
            .http
            .get(&api_url)
            .query(&[
                ("q", query),
                ("type", "video"),
                ("part", "id"),
                ("maxResults", "1"),
                ("key", self.config.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<SearchListResponse>()
            .await?;

        let video_id = res
            .items
            .into_iter()
            .find_map(|item| item.id.video_id)
            .ok_or_else(|| Error::NotFound(query.to_string()))?;

        Ok(format!("{}{}", self.config.watch_url, video_id))
    }
}

impl MediaLocator for YouTubeSearch {
    async fn locate(&self, title: &str, artist: &str, dir: &Path) -> Result<MediaSource> {
        if let Some(path) = storage::existing_track(dir, title, artist).await? {
            return Ok(MediaSource::Local(path));
        }

        let url = self.search(&search_query(title, artist)).await?;
        Ok(MediaSource::Remote(url))
    }
}
