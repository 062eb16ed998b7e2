//! SQLite-backed catalog of users, playlists, songs and downloads.
//!
//! # Tables
//!
//! * `users` - Accounts, unique by `username`.
//! * `playlists` - Imported playlists, unique by `(name, user_id)`.
//! * `songs` - Tracks of a playlist, unique by `(title, artist, playlist_id)`.
//! * `user_songs` - Which user triggered the download of which song.
//! * `sessions` - Login sessions keyed by a random token.
//!
//! Find-or-create operations insert with `ON CONFLICT DO NOTHING` and then
//! read the row back by its natural key, so a repeated import never creates
//! a second row regardless of which writer got there first.

use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::{
    error::{Error, Result},
    types::{Playlist, Song, User},
    utils,
};

const SESSION_TOKEN_LEN: usize = 48;

/// Sessions older than this are ignored and pruned.
pub const SESSION_MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;

pub struct CatalogStore {
    conn: Mutex<Connection>,
}

impl CatalogStore {
    /// Opens (or creates) the database file and ensures the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.set_prepared_statement_cache_capacity(64);
        create_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Io(std::io::Error::other("catalog connection lock poisoned")))
    }

    /// Registers a new user. Fails with `Error::Validation` if the username
    /// is taken.
    pub fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        let conn = self.conn()?;
        let inserted = conn
            .prepare_cached(
                "INSERT INTO users (username, password_hash) VALUES (?1, ?2)
                 ON CONFLICT (username) DO NOTHING",
            )?
            .execute(params![username, password_hash])?;

        if inserted == 0 {
            return Err(Error::Validation(
                "Username already exists. Please choose a different one.".to_string(),
            ));
        }

        Ok(User {
            id: conn.last_insert_rowid(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        })
    }

    pub fn find_user_by_name(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .prepare_cached("SELECT id, username, password_hash FROM users WHERE username = ?1")?
            .query_row([username], user_from_row)
            .optional()?;
        Ok(user)
    }

    pub fn find_user(&self, user_id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .prepare_cached("SELECT id, username, password_hash FROM users WHERE id = ?1")?
            .query_row([user_id], user_from_row)
            .optional()?;
        Ok(user)
    }

    /// Returns the playlist keyed by `(name, user_id)`, creating it if needed.
    /// The flag is `true` when the row was created by this call.
    pub fn find_or_create_playlist(&self, name: &str, user_id: i64) -> Result<(Playlist, bool)> {
        let conn = self.conn()?;
        let created = conn
            .prepare_cached(
                "INSERT INTO playlists (name, user_id) VALUES (?1, ?2)
                 ON CONFLICT (name, user_id) DO NOTHING",
            )?
            .execute(params![name, user_id])?
            == 1;

        let playlist = conn
            .prepare_cached("SELECT id, name, user_id FROM playlists WHERE name = ?1 AND user_id = ?2")?
            .query_row(params![name, user_id], |row| {
                Ok(Playlist {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    user_id: row.get(2)?,
                })
            })?;

        Ok((playlist, created))
    }

    pub fn playlists_for_user(&self, user_id: i64) -> Result<Vec<Playlist>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare_cached("SELECT id, name, user_id FROM playlists WHERE user_id = ?1 ORDER BY id")?;
        let rows = stmt.query_map([user_id], |row| {
            Ok(Playlist {
                id: row.get(0)?,
                name: row.get(1)?,
                user_id: row.get(2)?,
            })
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    /// Returns the song keyed by `(title, artist, playlist_id)`, creating it
    /// if needed. The flag is `true` when the row was created by this call.
    pub fn find_or_create_song(
        &self,
        title: &str,
        artist: &str,
        playlist_id: i64,
    ) -> Result<(Song, bool)> {
        let conn = self.conn()?;
        let created = conn
            .prepare_cached(
                "INSERT INTO songs (title, artist, playlist_id) VALUES (?1, ?2, ?3)
                 ON CONFLICT (title, artist, playlist_id) DO NOTHING",
            )?
            .execute(params![title, artist, playlist_id])?
            == 1;

        let song = conn
            .prepare_cached(
                "SELECT id, title, artist, youtube_url, album_cover_url, playlist_id
                 FROM songs
                 WHERE title = ?1 AND artist = ?2 AND playlist_id = ?3",
            )?
            .query_row(params![title, artist, playlist_id], song_from_row)?;

        Ok((song, created))
    }

    pub fn set_album_cover_url(&self, song_id: i64, url: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.prepare_cached("UPDATE songs SET album_cover_url = ?1 WHERE id = ?2")?
            .execute(params![url, song_id])?;
        Ok(())
    }

    pub fn set_source_url(&self, song_id: i64, url: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.prepare_cached("UPDATE songs SET youtube_url = ?1 WHERE id = ?2")?
            .execute(params![url, song_id])?;
        Ok(())
    }

    /// Records that `user_id` downloaded `song_id`. Returns `false` if the
    /// ownership already existed.
    pub fn add_ownership(&self, user_id: i64, song_id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let inserted = conn
            .prepare_cached(
                "INSERT INTO user_songs (user_id, song_id) VALUES (?1, ?2)
                 ON CONFLICT (user_id, song_id) DO NOTHING",
            )?
            .execute(params![user_id, song_id])?;
        Ok(inserted == 1)
    }

    pub fn ownership_count(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn
            .prepare_cached("SELECT COUNT(*) FROM user_songs WHERE user_id = ?1")?
            .query_row([user_id], |row| row.get(0))?;
        Ok(count)
    }

    /// Songs the user has downloaded, in the order they were first imported.
    pub fn downloaded_songs(&self, user_id: i64) -> Result<Vec<Song>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT s.id, s.title, s.artist, s.youtube_url, s.album_cover_url, s.playlist_id
             FROM songs s
             JOIN user_songs us ON us.song_id = s.id
             WHERE us.user_id = ?1
             ORDER BY s.id",
        )?;
        let rows = stmt.query_map([user_id], song_from_row)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    pub fn playlist_songs(&self, playlist_id: i64) -> Result<Vec<Song>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, title, artist, youtube_url, album_cover_url, playlist_id
             FROM songs
             WHERE playlist_id = ?1
             ORDER BY id",
        )?;
        let rows = stmt.query_map([playlist_id], song_from_row)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    /// Starts a session for the user and returns its token. Expired
    /// sessions are pruned on the way.
    pub fn create_session(&self, user_id: i64) -> Result<String> {
        let token = utils::generate_token(SESSION_TOKEN_LEN);
        let now = Utc::now().timestamp();
        let conn = self.conn()?;
        conn.prepare_cached("DELETE FROM sessions WHERE created_at <= ?1")?
            .execute([now - SESSION_MAX_AGE_SECS])?;
        conn.prepare_cached("INSERT INTO sessions (token, user_id, created_at) VALUES (?1, ?2, ?3)")?
            .execute(params![token, user_id, now])?;
        Ok(token)
    }

    pub fn session_user(&self, token: &str) -> Result<Option<User>> {
        self.session_user_at(token, Utc::now().timestamp())
    }

    /// Looks up the user of a session as of `now` (unix seconds). Sessions
    /// older than [`SESSION_MAX_AGE_SECS`] resolve to `None`.
    pub fn session_user_at(&self, token: &str, now: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .prepare_cached(
                "SELECT u.id, u.username, u.password_hash
                 FROM sessions s
                 JOIN users u ON u.id = s.user_id
                 WHERE s.token = ?1 AND s.created_at > ?2",
            )?
            .query_row(params![token, now - SESSION_MAX_AGE_SECS], user_from_row)
            .optional()?;
        Ok(user)
    }

    pub fn delete_session(&self, token: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.prepare_cached("DELETE FROM sessions WHERE token = ?1")?
            .execute([token])?;
        Ok(())
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
    })
}

fn song_from_row(row: &Row<'_>) -> rusqlite::Result<Song> {
    Ok(Song {
        id: row.get(0)?,
        title: row.get(1)?,
        artist: row.get(2)?,
        youtube_url: row.get(3)?,
        album_cover_url: row.get(4)?,
        playlist_id: row.get(5)?,
    })
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;

        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS playlists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            user_id INTEGER NOT NULL,
            UNIQUE (name, user_id),
            FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            artist TEXT NOT NULL,
            youtube_url TEXT,
            album_cover_url TEXT,
            playlist_id INTEGER,
            UNIQUE (title, artist, playlist_id),
            FOREIGN KEY (playlist_id) REFERENCES playlists (id) ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_songs_playlist_id ON songs (playlist_id);

        CREATE TABLE IF NOT EXISTS user_songs (
            user_id INTEGER NOT NULL,
            song_id INTEGER NOT NULL,
            PRIMARY KEY (user_id, song_id),
            FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE,
            FOREIGN KEY (song_id) REFERENCES songs (id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            created_at INTEGER NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
        );

        COMMIT;",
    )?;
    Ok(())
}
