//! YouTube integration.
//!
//! [`YouTubeSearch`] maps a track to a canonical watch URL through the Data
//! API v3 search endpoint. [`AudioDownloader`] opens the video with
//! `rusty_ytdl`, picks the first audio-only stream and writes it into the
//! downloads directory under the canonical track name. Both short-circuit on
//! tracks that are already downloaded.

mod download;
mod search;

pub use download::AudioDownloader;
pub use search::{YouTubeSearch, search_query};
