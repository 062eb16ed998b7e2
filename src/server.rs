use std::{net::SocketAddr, str::FromStr};

use axum::{
    Extension, Router,
    routing::{get, post},
};

use crate::{
    Res,
    api::{self, AppState},
    info,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/health", get(api::health))
        .route("/register", get(api::register_form).post(api::register))
        .route("/login", get(api::login_form).post(api::login))
        .route("/logout", get(api::logout))
        .route("/dashboard", get(api::dashboard).post(api::import_playlist))
        .route("/download_selected_songs", post(api::download_selected_songs))
        .layer(Extension(state))
}

/// Binds `address` and serves the web surface until the process stops.
pub async fn start_api_server(address: &str, state: AppState) -> Res<()> {
    let addr = SocketAddr::from_str(address)
        .map_err(|e| format!("Failed to parse server address {}: {}", address, e))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
