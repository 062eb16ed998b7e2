use axum::{Extension, Form, response::Html};
use serde::Deserialize;

use super::{
    AppState, CurrentUser,
    pages::{Flash, layout, render_flashes},
};
use crate::{
    archive::Selection,
    error::Error,
    importer::{ImportedTrack, TrackOutcome},
    types::{Song, User},
    utils::escape_html,
};

#[derive(Debug, Deserialize)]
pub struct ImportForm {
    #[serde(default)]
    pub spotify_link: String,
}

pub async fn dashboard(
    Extension(state): Extension<AppState>,
    CurrentUser(user): CurrentUser,
) -> Html<String> {
    render_dashboard(&state, &user, &[], &[])
}

/// Runs the playlist import for the submitted link and renders the result.
///
/// The import finishes, track by track, before the page is returned.
pub async fn import_playlist(
    Extension(state): Extension<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<ImportForm>,
) -> Html<String> {
    let mut flashes = Vec::new();
    let mut imported = Vec::new();

    match state.importer.import(user.id, &form.spotify_link).await {
        Ok(report) => {
            flashes.push(Flash::success(
                "Spotify playlist link is valid. Fetching songs...",
            ));
            for track in &report.tracks {
                flashes.push(match track.outcome {
                    TrackOutcome::Fetched(_) => Flash::success(track.status_line()),
                    TrackOutcome::Failed(_) => Flash::error(track.status_line()),
                });
            }
            imported = report.tracks;
        }
        Err(e @ Error::Validation(_)) => flashes.push(Flash::error(e.to_string())),
        Err(_) => {
            flashes.push(Flash::success(
                "Spotify playlist link is valid. Fetching songs...",
            ));
            flashes.push(Flash::error(
                "Failed to fetch songs from the Spotify playlist. Want to try again?",
            ));
        }
    }

    render_dashboard(&state, &user, &flashes, &imported)
}

fn render_dashboard(
    state: &AppState,
    user: &User,
    flashes: &[Flash],
    imported: &[ImportedTrack],
) -> Html<String> {
    let mut flashes = flashes.to_vec();
    let downloaded = match state.store.downloaded_songs(user.id) {
        Ok(songs) => songs,
        Err(e) => {
            flashes.push(Flash::error(format!("Cannot load your songs: {}", e)));
            Vec::new()
        }
    };

    let body = format!(
        "<h1>Hello, {name}</h1>
{flashes}
<form method=\"post\" action=\"/dashboard\">
  <label>Spotify playlist link <input name=\"spotify_link\" placeholder=\"https://open.spotify.com/playlist/...\"></label>
  <button type=\"submit\">Fetch songs</button>
</form>
{imported}
{downloaded}",
        name = escape_html(&user.username),
        flashes = render_flashes(&flashes),
        imported = render_imported(imported),
        downloaded = render_downloaded(&downloaded),
    );
    layout("Dashboard", &body)
}

fn render_imported(tracks: &[ImportedTrack]) -> String {
    if tracks.is_empty() {
        return String::new();
    }

    let mut out = String::from("<h2>Playlist songs</h2><ul class=\"playlist-songs\">");
    for track in tracks {
        let cover = track
            .album_cover_url
            .as_deref()
            .map(|url| format!("<img src=\"{}\" alt=\"\" width=\"64\"> ", escape_html(url)))
            .unwrap_or_default();
        let status = match &track.outcome {
            TrackOutcome::Fetched(_) => "fetched".to_string(),
            TrackOutcome::Failed(reason) => format!("failed: {}", escape_html(reason)),
        };
        out.push_str(&format!(
            "<li>{}{} by {} ({})</li>",
            cover,
            escape_html(&track.song.title),
            escape_html(&track.song.artist),
            status
        ));
    }
    out.push_str("</ul>");
    out
}

fn render_downloaded(songs: &[Song]) -> String {
    if songs.is_empty() {
        return "<p>No downloaded songs yet.</p>".to_string();
    }

    let mut out = String::from(
        "<h2>Downloaded songs</h2>
<form method=\"post\" action=\"/download_selected_songs\">
<label><input type=\"checkbox\" onclick=\"document.querySelectorAll('input[name=selected_songs]').forEach(c => c.checked = this.checked)\"> Select all</label>
<ul class=\"downloaded-songs\">",
    );
    for song in songs {
        let value = Selection::new(song.title.clone(), song.artist.clone()).form_value();
        out.push_str(&format!(
            "<li><label><input type=\"checkbox\" name=\"selected_songs\" value=\"{}\"> {} by {}</label></li>",
            escape_html(&value),
            escape_html(&song.title),
            escape_html(&song.artist)
        ));
    }
    out.push_str("</ul><button type=\"submit\">Download selected</button></form>");
    out
}
