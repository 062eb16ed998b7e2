use std::sync::Arc;

use tabled::Table;

use crate::{
    config::AppConfig,
    error,
    importer::TrackOutcome,
    success,
    types::ImportTableRow,
    warning,
};

pub async fn import(link: String, username: String) {
    let app = AppConfig::from_env();
    let store = super::open_store(&app);
    let user = super::find_user(&store, &username);
    let importer = super::build_importer(&app, Arc::clone(&store)).await;

    let report = match importer.import(user.id, &link).await {
        Ok(report) => report,
        Err(e) => error!("Import failed. Err: {}", e),
    };

    let rows: Vec<ImportTableRow> = report
        .tracks
        .iter()
        .map(|t| ImportTableRow {
            title: t.song.title.clone(),
            artist: t.song.artist.clone(),
            status: match &t.outcome {
                TrackOutcome::Fetched(path) => format!("fetched ({})", path.display()),
                TrackOutcome::Failed(reason) => format!("failed: {}", reason),
            },
        })
        .collect();
    println!("{}", Table::new(rows));

    let failed = report.failed().count();
    if failed == 0 {
        success!(
            "Imported {} songs from {}",
            report.fetched_count(),
            report.playlist.name
        );
    } else {
        warning!(
            "Imported {} songs from {}, {} failed",
            report.fetched_count(),
            report.playlist.name,
            failed
        );
    }
}
