//! spotyt library
//!
//! Imports Spotify playlists into a local catalog, locates a matching YouTube
//! video for every track, stores the audio stream in a downloads directory and
//! bundles selected downloads into ZIP archives.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the web surface (pages, auth, import, archive)
//! - `archive` - ZIP bundling of downloaded tracks
//! - `cli` - Command-line interface implementations
//! - `config` - Environment loading and typed client configuration
//! - `error` - Crate error type
//! - `importer` - Playlist import orchestration
//! - `management` - SQLite catalog store and API token caching
//! - `server` - axum router and listener
//! - `sources` - Traits for metadata, locating and fetching media
//! - `spotify` - Spotify Web API client (playlist + album metadata)
//! - `storage` - Download file naming convention and existence checks
//! - `types` - Data structures and type definitions
//! - `utils` - Tokens, password hashing and HTML helpers
//! - `youtube` - YouTube search and audio stream download

pub mod api;
pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod importer;
pub mod management;
pub mod server;
pub mod sources;
pub mod spotify;
pub mod storage;
pub mod types;
pub mod utils;
pub mod youtube;

/// Boxed result used by the binary and CLI glue code.
///
/// Library operations return [`error::Result`]; this alias exists for the
/// places where several unrelated error types meet (startup, CLI commands).
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Importing playlist {}", playlist_id);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Successfully fetched {} by {}", title, artist);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only the binary and the CLI commands use this macro. Library code that the
/// web server reaches returns [`error::Error`] instead, a request must never
/// take the process down.
///
/// # Example
///
/// ```
/// error!("Cannot open catalog database. Err: {}", e);
/// // Program exits here
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable failures, for example a single track that could not
/// be located or fetched during an import.
///
/// # Example
///
/// ```
/// warning!("Failed to fetch {} by {}: {}", title, artist, reason);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
