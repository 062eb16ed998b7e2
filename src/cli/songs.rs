use tabled::Table;

use crate::{config::AppConfig, error, info, types::SongTableRow};

pub async fn songs(username: String) {
    let app = AppConfig::from_env();
    let store = super::open_store(&app);
    let user = super::find_user(&store, &username);

    let songs = match store.downloaded_songs(user.id) {
        Ok(songs) => songs,
        Err(e) => error!("Cannot load songs for {}. Err: {}", username, e),
    };

    if songs.is_empty() {
        info!("{} has no downloaded songs yet.", username);
        return;
    }

    let rows: Vec<SongTableRow> = songs
        .into_iter()
        .map(|s| SongTableRow {
            title: s.title,
            artist: s.artist,
            source: s.youtube_url.unwrap_or_else(|| "-".to_string()),
        })
        .collect();
    println!("{}", Table::new(rows));
}
