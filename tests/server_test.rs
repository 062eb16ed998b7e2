use std::{
    io::{Cursor, Read},
    sync::Arc,
};

use axum::Json;
use reqwest::{Client, StatusCode, header, redirect::Policy};
use serde_json::Value;
use spotyt::{
    api::{AppState, SESSION_COOKIE, health_report},
    archive::Selection,
    config::{SpotifyConfig, YOUTUBE_WATCH_URL, YouTubeConfig},
    importer::Importer,
    management::CatalogStore,
    server,
    spotify::SpotifyClient,
    storage, utils,
    youtube::{AudioDownloader, YouTubeSearch},
};

struct TestServer {
    base: String,
    client: Client,
    store: Arc<CatalogStore>,
    dir: tempfile::TempDir,
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn register(&self, username: &str, password: &str) -> i64 {
        self.store
            .create_user(
                username,
                &utils::hash_password_with_iterations(password, 1_000),
            )
            .unwrap()
            .id
    }

    fn session_for(&self, user_id: i64) -> String {
        let token = self.store.create_session(user_id).unwrap();
        format!("{}={}", SESSION_COOKIE, token)
    }

    fn write_track(&self, title: &str, artist: &str, bytes: &[u8]) {
        let path = storage::track_path(self.dir.path(), title, artist).unwrap();
        std::fs::write(path, bytes).unwrap();
    }
}

// External services point at a closed local port, nothing leaves the machine.
async fn start() -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(CatalogStore::open_in_memory().unwrap());

    let spotify = SpotifyClient::new(
        SpotifyConfig {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            api_url: "http://127.0.0.1:9/v1".to_string(),
            token_url: "http://127.0.0.1:9/api/token".to_string(),
        },
        "https://covers.test/default.png",
    );
    let search = YouTubeSearch::new(YouTubeConfig {
        api_key: "test-key".to_string(),
        api_url: "http://127.0.0.1:9".to_string(),
        watch_url: YOUTUBE_WATCH_URL.to_string(),
    });
    let importer = Importer::new(
        spotify,
        search,
        AudioDownloader::new(),
        Arc::clone(&store),
        dir.path(),
    );
    let state = AppState {
        store: Arc::clone(&store),
        importer: Arc::new(importer),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, server::router(state)).await.unwrap();
    });

    TestServer {
        base: format!("http://{}", addr),
        client: Client::builder().redirect(Policy::none()).build().unwrap(),
        store,
        dir,
    }
}

fn location(res: &reqwest::Response) -> &str {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_health() {
    let server = start().await;

    let res = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["catalog"], "ok");
    assert_eq!(body["name"], "spotyt");
}

#[test]
fn test_health_report_reflects_catalog() {
    let (code, Json(body)) = health_report(false);
    assert_eq!(code, axum::http::StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["catalog"], "unavailable");

    let (code, Json(body)) = health_report(true);
    assert_eq!(code, axum::http::StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_protected_pages_redirect_to_login() {
    let server = start().await;

    let res = server.client.get(server.url("/dashboard")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/login");

    let res = server
        .client
        .post(server.url("/download_selected_songs"))
        .form(&[("selected_songs", "Song A|Artist X")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/login");

    // Unknown session token
    let res = server
        .client
        .get(server.url("/dashboard"))
        .header(header::COOKIE, format!("{}=bogus", SESSION_COOKIE))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_login_starts_session() {
    let server = start().await;
    server.register("alice", "correct horse");

    let res = server
        .client
        .post(server.url("/login"))
        .form(&[("username", "alice"), ("password", "correct horse")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/dashboard");

    let cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with(&format!("{}=", SESSION_COOKIE)));
    assert!(cookie.contains("HttpOnly"));
    let pair = cookie.split(';').next().unwrap().to_string();

    let res = server
        .client
        .get(server.url("/dashboard"))
        .header(header::COOKIE, pair)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("Hello, alice"));
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let server = start().await;
    server.register("alice", "correct horse");

    let res = server
        .client
        .post(server.url("/login"))
        .form(&[("username", "alice"), ("password", "battery staple")])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get(header::SET_COOKIE).is_none());
    assert!(
        res.text()
            .await
            .unwrap()
            .contains("Invalid username or password")
    );
}

#[tokio::test]
async fn test_invalid_playlist_link_renders_flash() {
    let server = start().await;
    let user = server.register("alice", "correct horse");
    let cookie = server.session_for(user);

    let res = server
        .client
        .post(server.url("/dashboard"))
        .header(header::COOKIE, cookie)
        .form(&[("spotify_link", "https://open.spotify.com/album/ABC123")])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await.unwrap();
    assert!(body.contains("Invalid Spotify playlist link"));
    assert!(!body.contains("Fetching songs"));
    assert!(server.store.playlists_for_user(user).unwrap().is_empty());
}

#[tokio::test]
async fn test_dashboard_lists_downloaded_songs() {
    let server = start().await;
    let user = server.register("alice", "correct horse");
    let (playlist, _) = server.store.find_or_create_playlist("Live", user).unwrap();
    let (song, _) = server
        .store
        .find_or_create_song("Live|Unplugged", "Band", playlist.id)
        .unwrap();
    server.store.add_ownership(user, song.id).unwrap();

    let res = server
        .client
        .get(server.url("/dashboard"))
        .header(header::COOKIE, server.session_for(user))
        .send()
        .await
        .unwrap();

    let body = res.text().await.unwrap();
    let value = Selection::new("Live|Unplugged", "Band").form_value();
    assert!(body.contains(&format!("name=\"selected_songs\" value=\"{}\"", value)));
}

#[tokio::test]
async fn test_download_selected_songs_returns_zip() {
    let server = start().await;
    let user = server.register("alice", "correct horse");
    server.write_track("Song A", "Artist X", b"first track");
    server.write_track("Live|Unplugged", "Band", b"live set");

    let res = server
        .client
        .post(server.url("/download_selected_songs"))
        .header(header::COOKIE, server.session_for(user))
        .form(&[
            ("selected_songs", "Song A|Artist X".to_string()),
            (
                "selected_songs",
                Selection::new("Live|Unplugged", "Band").form_value(),
            ),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/zip");
    assert_eq!(
        res.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"selected_songs.zip\""
    );

    let bytes = res.bytes().await.unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    assert_eq!(archive.len(), 2);
    let mut content = String::new();
    archive
        .by_name("Live|Unplugged by Band.mp3")
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    assert_eq!(content, "live set");
}

#[tokio::test]
async fn test_download_missing_song_is_not_found() {
    let server = start().await;
    let user = server.register("alice", "correct horse");
    server.write_track("Song A", "Artist X", b"first track");

    let res = server
        .client
        .post(server.url("/download_selected_songs"))
        .header(header::COOKIE, server.session_for(user))
        .form(&[
            ("selected_songs", "Song A|Artist X"),
            ("selected_songs", "Song B|Artist Y"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.text().await.unwrap().contains("Song B by Artist Y.mp3"));
}

#[tokio::test]
async fn test_download_without_selection_is_bad_request() {
    let server = start().await;
    let user = server.register("alice", "correct horse");

    let res = server
        .client
        .post(server.url("/download_selected_songs"))
        .header(header::COOKIE, server.session_for(user))
        .form(&[("other", "value")])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
