use std::path::{Path, PathBuf};

use rusty_ytdl::{Video, VideoOptions, VideoSearchOptions};
use tokio::io::AsyncWriteExt;

use crate::{
    error::{Error, Result},
    info,
    sources::{MediaFetcher, MediaSource},
    storage, success,
};

/// Downloads the first audio-only stream of a video.
///
/// The bytes are stored as delivered (usually webm/opus or m4a); the `.mp3`
/// extension is the naming convention of the downloads directory, no
/// transcoding happens.
#[derive(Debug, Default, Clone)]
pub struct AudioDownloader;

impl AudioDownloader {
    pub fn new() -> Self {
        Self
    }

    async fn download(&self, url: &str, title: &str, artist: &str, target: &Path) -> Result<()> {
        let fetch_err = |reason: String| Error::Fetch {
            title: title.to_string(),
            artist: artist.to_string(),
            reason,
        };

        let video_opts = VideoOptions {
            filter: VideoSearchOptions::Audio,
            ..Default::default()
        };
        let video = Video::new_with_options(url, video_opts)
            .map_err(|e| fetch_err(format!("Failed to open video: {e}")))?;

        let video_info = video
            .get_info()
            .await
            .map_err(|e| fetch_err(format!("Failed to get video info: {e}")))?;

        if !video_info
            .formats
            .iter()
            .any(|format| format.has_audio && !format.has_video)
        {
            return Err(fetch_err(format!(
                "No audio stream available for {}",
                video_info.video_details.title
            )));
        }

        let stream = video
            .stream()
            .await
            .map_err(|e| fetch_err(format!("Failed to create stream: {e}")))?;

        let part_path = target.with_extension("mp3.part");
        let mut file = tokio::fs::File::create(&part_path)
            .await
            .map_err(|e| fetch_err(format!("Failed to create file: {e}")))?;

        let mut total_bytes = 0u64;
        let written: Result<()> = async {
            while let Some(chunk) = stream
                .chunk()
                .await
                .map_err(|e| fetch_err(format!("Failed to download chunk: {e}")))?
            {
                total_bytes += chunk.len() as u64;
                file.write_all(&chunk)
                    .await
                    .map_err(|e| fetch_err(format!("Failed to write chunk: {e}")))?;
            }
            file.flush()
                .await
                .map_err(|e| fetch_err(format!("Failed to flush file: {e}")))?;
            Ok(())
        }
        .await;

        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(e);
        }

        tokio::fs::rename(&part_path, target)
            .await
            .map_err(|e| fetch_err(format!("Failed to move download into place: {e}")))?;

        info!("Downloaded {} bytes -> {}", total_bytes, target.display());
        Ok(())
    }
}

impl MediaFetcher for AudioDownloader {
    async fn fetch(
        &self,
        source: &MediaSource,
        title: &str,
        artist: &str,
        dir: &Path,
    ) -> Result<PathBuf> {
        if let Some(path) = storage::existing_track(dir, title, artist).await? {
            info!("{} already exists. Skipping download.", path.display());
            return Ok(path);
        }

        match source {
            MediaSource::Local(path) => Ok(path.clone()),
            MediaSource::Remote(url) => {
                let target = storage::track_path(dir, title, artist)?;
                self.download(url, title, artist, &target).await?;
                success!("Saved {} by {}", title, artist);
                Ok(target)
            }
        }
    }
}
