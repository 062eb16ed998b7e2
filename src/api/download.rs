use axum::{Extension, Form, http::header, response::IntoResponse};

use super::{AppState, CurrentUser};
use crate::{
    archive::{self, ARCHIVE_NAME},
    error::Result,
    info,
};

const SELECTION_FIELD: &str = "selected_songs";

/// Streams back a ZIP of the selected songs.
///
/// The form carries one `selected_songs=title|artist` pair per checked song.
/// A selection whose file is not downloaded fails the whole request with 404.
pub async fn download_selected_songs(
    Extension(state): Extension<AppState>,
    CurrentUser(user): CurrentUser,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<impl IntoResponse> {
    let selections = archive::parse_selections(
        fields
            .iter()
            .filter(|(key, _)| key == SELECTION_FIELD)
            .map(|(_, value)| value.as_str()),
    )?;

    let bytes = archive::build_zip(state.importer.downloads_dir(), &selections).await?;
    info!(
        "Built {} with {} songs for {}",
        ARCHIVE_NAME,
        selections.len(),
        user.username
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", ARCHIVE_NAME),
            ),
        ],
        bytes,
    ))
}
