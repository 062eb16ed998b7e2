//! # API Module
//!
//! HTTP handlers for the spotyt web surface. Pages are plain server-rendered
//! HTML; every page except the landing page and the account forms requires a
//! session.
//!
//! ## Endpoints
//!
//! - `GET /` - landing page
//! - `GET|POST /register` - account creation
//! - `GET|POST /login` - session start
//! - `GET /logout` - session end
//! - `GET|POST /dashboard` - downloaded songs, playlist import (`spotify_link`)
//! - `POST /download_selected_songs` - ZIP of the `selected_songs` values
//! - `GET /health` - status and version
//!
//! Handlers receive the shared [`AppState`] through an axum `Extension` layer.

mod account;
mod dashboard;
mod download;
mod health;
mod pages;
mod session;

use std::sync::Arc;

use crate::{
    importer::Importer,
    management::CatalogStore,
    spotify::SpotifyClient,
    youtube::{AudioDownloader, YouTubeSearch},
};

pub use account::{Credentials, login, login_form, logout, register, register_form};
pub use dashboard::{dashboard, import_playlist};
pub use download::download_selected_songs;
pub use health::{health, health_report};
pub use pages::index;
pub use session::{CurrentUser, SESSION_COOKIE};

pub type AppImporter = Importer<SpotifyClient, YouTubeSearch, AudioDownloader>;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CatalogStore>,
    pub importer: Arc<AppImporter>,
}
