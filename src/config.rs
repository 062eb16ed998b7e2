//! Configuration management for spotyt.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file in the local data directory. Each external client gets its own typed
//! configuration which the binary builds once and hands to the client
//! constructor; nothing in the library reads the environment on its own.
//!
//! Lookup order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5000";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";
pub const DEFAULT_COVER_URL: &str = "/static/default-cover.png";

/// Loads environment variables from `<data_local_dir>/spotyt/.env`.
///
/// Creates the directory if needed. A missing `.env` file is not an error,
/// the process environment alone may carry the configuration. Variables that
/// are already set are never overwritten by the file.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotyt/.env`
/// - macOS: `~/Library/Application Support/spotyt/.env`
/// - Windows: `%LOCALAPPDATA%/spotyt/.env`
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
    }
    Ok(())
}

/// Returns the application's local data directory, `<data_local_dir>/spotyt`.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotyt");
    path
}

fn required(key: &str) -> Result<String, String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(format!("{} must be set", key)),
    }
}

fn optional(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Credentials and endpoints for the Spotify Web API (client-credentials flow).
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub api_url: String,
    pub token_url: String,
}

impl SpotifyConfig {
    /// Reads `SPOTIFY_CLIENT_ID` and `SPOTIFY_CLIENT_SECRET` (required) and
    /// the optional `SPOTIFY_API_URL` / `SPOTIFY_TOKEN_URL` overrides.
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            api_url: optional("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL),
            token_url: optional("SPOTIFY_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL),
        })
    }
}

/// API key and endpoints for the YouTube Data API.
#[derive(Debug, Clone)]
pub struct YouTubeConfig {
    pub api_key: String,
    pub api_url: String,
    pub watch_url: String,
}

impl YouTubeConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            api_key: required("YOUTUBE_API_KEY")?,
            api_url: optional("YOUTUBE_API_URL", DEFAULT_YOUTUBE_API_URL),
            watch_url: YOUTUBE_WATCH_URL.to_string(),
        })
    }
}

/// Server, database and storage locations.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_address: String,
    pub database_path: PathBuf,
    pub downloads_dir: PathBuf,
    pub default_cover_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_path = env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir().join("spotyt.db"));
        let downloads_dir = env::var("DOWNLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir().join("downloads"));

        Self {
            server_address: optional("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            database_path,
            downloads_dir,
            default_cover_url: optional("DEFAULT_COVER_URL", DEFAULT_COVER_URL),
        }
    }
}
