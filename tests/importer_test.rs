use std::{
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use spotyt::{
    error::{Error, Result},
    importer::{Importer, TrackOutcome, extract_playlist_id},
    management::CatalogStore,
    sources::{
        CatalogPlaylist, CatalogTrack, MediaFetcher, MediaLocator, MediaSource, MetadataSource,
    },
    storage, utils,
    youtube::search_query,
};

const LINK: &str = "https://open.spotify.com/playlist/ABC123?si=xyz";

struct FakeCatalog {
    playlist: Option<CatalogPlaylist>,
    playlist_calls: Arc<AtomicUsize>,
    cover_calls: Arc<AtomicUsize>,
}

impl MetadataSource for FakeCatalog {
    async fn fetch_playlist(&self, playlist_id: &str) -> Result<CatalogPlaylist> {
        assert_eq!(playlist_id, "ABC123");
        self.playlist_calls.fetch_add(1, Ordering::SeqCst);
        self.playlist
            .clone()
            .ok_or_else(|| Error::Upstream("catalog unavailable".to_string()))
    }

    async fn fetch_album_cover_url(&self, album_id: &str) -> String {
        self.cover_calls.fetch_add(1, Ordering::SeqCst);
        format!("https://covers.test/{album_id}.jpg")
    }
}

/// Resolves every title except the ones listed in `unknown`.
struct FakeLocator {
    unknown: Vec<String>,
    searches: Arc<AtomicUsize>,
}

impl MediaLocator for FakeLocator {
    async fn locate(&self, title: &str, artist: &str, dir: &Path) -> Result<MediaSource> {
        if let Some(path) = storage::existing_track(dir, title, artist).await? {
            return Ok(MediaSource::Local(path));
        }

        self.searches.fetch_add(1, Ordering::SeqCst);
        if self.unknown.iter().any(|t| t == title) {
            return Err(Error::NotFound(search_query(title, artist)));
        }
        Ok(MediaSource::Remote(format!(
            "https://www.youtube.com/watch?v={}",
            title.replace(' ', "")
        )))
    }
}

/// Writes a few bytes per remote source and records which URLs it fetched.
struct FakeFetcher {
    fetched: Arc<Mutex<Vec<String>>>,
}

impl MediaFetcher for FakeFetcher {
    async fn fetch(
        &self,
        source: &MediaSource,
        title: &str,
        artist: &str,
        dir: &Path,
    ) -> Result<PathBuf> {
        if let Some(path) = storage::existing_track(dir, title, artist).await? {
            return Ok(path);
        }
        match source {
            MediaSource::Local(path) => Ok(path.clone()),
            MediaSource::Remote(url) => {
                self.fetched.lock().unwrap().push(url.clone());
                let path = storage::track_path(dir, title, artist)?;
                tokio::fs::write(&path, b"audio").await?;
                Ok(path)
            }
        }
    }
}

struct Harness {
    importer: Importer<FakeCatalog, FakeLocator, FakeFetcher>,
    store: Arc<CatalogStore>,
    user_id: i64,
    playlist_calls: Arc<AtomicUsize>,
    cover_calls: Arc<AtomicUsize>,
    searches: Arc<AtomicUsize>,
    fetched: Arc<Mutex<Vec<String>>>,
    _dir: tempfile::TempDir,
}

fn track(title: &str, artist: &str, album: &str) -> CatalogTrack {
    CatalogTrack {
        title: title.to_string(),
        artist: artist.to_string(),
        album_id: Some(album.to_string()),
    }
}

fn road_trip() -> CatalogPlaylist {
    CatalogPlaylist {
        name: "Road Trip".to_string(),
        tracks: vec![
            track("Song A", "Artist X", "album1"),
            track("Song B", "Artist Y", "album2"),
            track("Song C", "Artist X, Artist Z", "album3"),
        ],
    }
}

fn harness(playlist: Option<CatalogPlaylist>, unknown: &[&str]) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(CatalogStore::open_in_memory().unwrap());
    let user_id = store
        .create_user("alice", &utils::hash_password_with_iterations("password", 1_000))
        .unwrap()
        .id;

    let playlist_calls = Arc::new(AtomicUsize::new(0));
    let cover_calls = Arc::new(AtomicUsize::new(0));
    let searches = Arc::new(AtomicUsize::new(0));
    let fetched = Arc::new(Mutex::new(Vec::new()));

    let importer = Importer::new(
        FakeCatalog {
            playlist,
            playlist_calls: Arc::clone(&playlist_calls),
            cover_calls: Arc::clone(&cover_calls),
        },
        FakeLocator {
            unknown: unknown.iter().map(|s| s.to_string()).collect(),
            searches: Arc::clone(&searches),
        },
        FakeFetcher {
            fetched: Arc::clone(&fetched),
        },
        Arc::clone(&store),
        dir.path(),
    );

    Harness {
        importer,
        store,
        user_id,
        playlist_calls,
        cover_calls,
        searches,
        fetched,
        _dir: dir,
    }
}

#[test]
fn test_extract_playlist_id_strips_query_string() {
    assert_eq!(extract_playlist_id(LINK).unwrap(), "ABC123");
    assert_eq!(
        extract_playlist_id("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M").unwrap(),
        "37i9dQZF1DXcBWIGoYBM5M"
    );
    assert_eq!(
        extract_playlist_id("  https://open.spotify.com/playlist/ABC123#top ").unwrap(),
        "ABC123"
    );
}

#[test]
fn test_extract_playlist_id_rejects_other_links() {
    for link in [
        "",
        "ABC123",
        "https://open.spotify.com/album/ABC123",
        "http://open.spotify.com/playlist/ABC123",
        "https://example.com/playlist/ABC123",
        "https://open.spotify.com/playlist/",
        "https://open.spotify.com/playlist/?si=xyz",
        "https://open.spotify.com/playlist/ABC/123",
    ] {
        assert!(
            matches!(extract_playlist_id(link), Err(Error::Validation(_))),
            "accepted {link:?}"
        );
    }
}

#[tokio::test]
async fn test_import_fetches_every_track() {
    let h = harness(Some(road_trip()), &[]);

    let report = h.importer.import(h.user_id, LINK).await.unwrap();

    assert_eq!(report.playlist.name, "Road Trip");
    assert!(report.playlist_created);
    assert_eq!(report.tracks.len(), 3);
    assert_eq!(report.fetched_count(), 3);
    assert!(report.tracks.iter().all(|t| t.created));

    // Catalog order is preserved
    let titles: Vec<_> = report.tracks.iter().map(|t| t.song.title.as_str()).collect();
    assert_eq!(titles, ["Song A", "Song B", "Song C"]);

    assert_eq!(
        report.tracks[0].album_cover_url.as_deref(),
        Some("https://covers.test/album1.jpg")
    );
    assert_eq!(
        report.tracks[0].status_line(),
        "Successfully fetched Song A by Artist X"
    );

    for t in &report.tracks {
        let expected = storage::track_path(h.importer.downloads_dir(), &t.song.title, &t.song.artist)
            .unwrap();
        assert_eq!(t.outcome, TrackOutcome::Fetched(expected.clone()));
        assert!(expected.is_file());
    }

    assert_eq!(h.store.ownership_count(h.user_id).unwrap(), 3);
    let songs = h.store.downloaded_songs(h.user_id).unwrap();
    assert_eq!(
        songs[0].youtube_url.as_deref(),
        Some("https://www.youtube.com/watch?v=SongA")
    );
    assert_eq!(h.fetched.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_reimport_does_not_duplicate_rows() {
    let h = harness(Some(road_trip()), &[]);

    let first = h.importer.import(h.user_id, LINK).await.unwrap();
    let second = h.importer.import(h.user_id, LINK).await.unwrap();

    assert!(!second.playlist_created);
    assert_eq!(first.playlist.id, second.playlist.id);
    assert!(second.tracks.iter().all(|t| !t.created));

    let first_ids: Vec<_> = first.tracks.iter().map(|t| t.song.id).collect();
    let second_ids: Vec<_> = second.tracks.iter().map(|t| t.song.id).collect();
    assert_eq!(first_ids, second_ids);

    assert_eq!(h.store.playlists_for_user(h.user_id).unwrap().len(), 1);
    assert_eq!(h.store.playlist_songs(first.playlist.id).unwrap().len(), 3);
    assert_eq!(h.store.ownership_count(h.user_id).unwrap(), 3);

    // Covers are stored with the song, not fetched again
    assert_eq!(h.cover_calls.load(Ordering::SeqCst), 3);
    assert_eq!(
        second.tracks[1].album_cover_url.as_deref(),
        Some("https://covers.test/album2.jpg")
    );

    // Files already exist, so nothing is searched or downloaded twice
    assert_eq!(h.searches.load(Ordering::SeqCst), 3);
    assert_eq!(h.fetched.lock().unwrap().len(), 3);
    assert_eq!(second.fetched_count(), 3);
}

#[tokio::test]
async fn test_failed_track_does_not_stop_the_import() {
    let h = harness(Some(road_trip()), &["Song B"]);

    let report = h.importer.import(h.user_id, LINK).await.unwrap();

    assert_eq!(report.tracks.len(), 3);
    assert_eq!(report.fetched_count(), 2);

    let failed: Vec<_> = report.failed().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].song.title, "Song B");
    assert_eq!(failed[0].status_line(), "Failed to fetch Song B by Artist Y");
    match &failed[0].outcome {
        TrackOutcome::Failed(reason) => assert!(reason.contains("Song B by Artist Y music video")),
        other => panic!("unexpected outcome {other:?}"),
    }

    // The track after the failure was still attempted
    assert!(report.tracks[2].succeeded());
    assert_eq!(h.searches.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_unsafe_track_name_fails_only_that_track() {
    let playlist = CatalogPlaylist {
        name: "Mixed".to_string(),
        tracks: vec![
            track("AC/DC Tribute", "Cover Band", "album1"),
            track("Song A", "Artist X", "album2"),
        ],
    };
    let h = harness(Some(playlist), &[]);

    let report = h.importer.import(h.user_id, LINK).await.unwrap();

    assert!(!report.tracks[0].succeeded());
    assert!(report.tracks[1].succeeded());
}

#[tokio::test]
async fn test_invalid_link_writes_nothing() {
    let h = harness(Some(road_trip()), &[]);

    let result = h
        .importer
        .import(h.user_id, "https://open.spotify.com/album/ABC123")
        .await;

    assert!(matches!(result, Err(Error::Validation(_))));
    assert_eq!(h.playlist_calls.load(Ordering::SeqCst), 0);
    assert!(h.store.playlists_for_user(h.user_id).unwrap().is_empty());
    assert_eq!(h.store.ownership_count(h.user_id).unwrap(), 0);
}

#[tokio::test]
async fn test_upstream_failure_writes_nothing() {
    let h = harness(None, &[]);

    let result = h.importer.import(h.user_id, LINK).await;

    assert!(matches!(result, Err(Error::Upstream(_))));
    assert_eq!(h.playlist_calls.load(Ordering::SeqCst), 1);
    assert!(h.store.playlists_for_user(h.user_id).unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_playlist_writes_nothing() {
    let h = harness(
        Some(CatalogPlaylist {
            name: "Empty".to_string(),
            tracks: Vec::new(),
        }),
        &[],
    );

    let result = h.importer.import(h.user_id, LINK).await;

    assert!(matches!(result, Err(Error::Upstream(_))));
    assert!(h.store.playlists_for_user(h.user_id).unwrap().is_empty());
}
