//! # CLI Module
//!
//! Command implementations for the `spotyt` binary. Each command builds the
//! clients it needs from the environment, runs, and reports with the crate's
//! logging macros. Fatal problems (missing credentials, unreadable database)
//! end the process through [`crate::error!`].
//!
//! ## Commands
//!
//! - [`serve`] - run the web surface
//! - [`register`] - create a user account
//! - [`import`] - import a playlist for a user from the terminal
//! - [`songs`] - list a user's downloaded songs
//! - [`zip`] - bundle downloaded songs into an archive file
//!
//! ```bash
//! spotyt register alice --password secret
//! spotyt import https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M --user alice
//! spotyt songs --user alice
//! spotyt zip "Song A|Artist X" "Song B|Artist Y" --output picks.zip
//! spotyt serve --open
//! ```

mod archive;
mod import;
mod register;
mod serve;
mod songs;

use std::sync::Arc;

use crate::{
    api::AppImporter,
    config::{AppConfig, SpotifyConfig, YouTubeConfig},
    error,
    importer::Importer,
    management::CatalogStore,
    spotify::SpotifyClient,
    storage,
    types::User,
    youtube::{AudioDownloader, YouTubeSearch},
};

pub use archive::zip;
pub use import::import;
pub use register::register;
pub use serve::serve;
pub use songs::songs;

fn open_store(app: &AppConfig) -> Arc<CatalogStore> {
    match CatalogStore::open(&app.database_path) {
        Ok(store) => Arc::new(store),
        Err(e) => error!(
            "Cannot open catalog database {}. Err: {}",
            app.database_path.display(),
            e
        ),
    }
}

fn find_user(store: &CatalogStore, username: &str) -> User {
    match store.find_user_by_name(username) {
        Ok(Some(user)) => user,
        Ok(None) => error!(
            "Unknown user {}. Run spotyt register {} first.",
            username, username
        ),
        Err(e) => error!("Cannot load user {}. Err: {}", username, e),
    }
}

async fn build_importer(app: &AppConfig, store: Arc<CatalogStore>) -> AppImporter {
    let spotify = match SpotifyConfig::from_env() {
        Ok(config) => SpotifyClient::new(config, app.default_cover_url.clone()),
        Err(e) => error!("Missing Spotify configuration: {}", e),
    };
    let search = match YouTubeConfig::from_env() {
        Ok(config) => YouTubeSearch::new(config),
        Err(e) => error!("Missing YouTube configuration: {}", e),
    };

    if let Err(e) = storage::ensure_downloads_dir(&app.downloads_dir).await {
        error!(
            "Cannot create downloads directory {}. Err: {}",
            app.downloads_dir.display(),
            e
        );
    }

    Importer::new(
        spotify,
        search,
        AudioDownloader::new(),
        store,
        app.downloads_dir.clone(),
    )
}
