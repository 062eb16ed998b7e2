//! ZIP bundling of downloaded tracks.

use std::{
    collections::HashSet,
    io::{Cursor, Write},
    path::Path,
};

use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::{
    error::{Error, Result},
    storage,
};

pub const ARCHIVE_NAME: &str = "selected_songs.zip";

/// A track picked for download, submitted as `"{title}|{artist}"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub title: String,
    pub artist: String,
}

impl Selection {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }

    /// Parses `"{title}|{artist}"`, splitting on the first unescaped `|`.
    ///
    /// A `|` inside a title or artist is written as `\|` by
    /// [`Selection::form_value`]. Track names never contain `\`, so the
    /// escape cannot clash with a stored name.
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = || {
            Error::Validation(format!("\"{}\" is not a valid song selection", value))
        };

        let split = separator_index(value).ok_or_else(invalid)?;
        let title = unescape(&value[..split]);
        let artist = unescape(&value[split + 1..]);
        if title.is_empty() || artist.is_empty() {
            return Err(invalid());
        }
        Ok(Self::new(title, artist))
    }

    pub fn form_value(&self) -> String {
        format!("{}|{}", escape(&self.title), escape(&self.artist))
    }
}

fn escape(part: &str) -> String {
    part.replace('|', "\\|")
}

fn unescape(part: &str) -> String {
    part.replace("\\|", "|")
}

/// Byte index of the first `|` not preceded by `\`.
fn separator_index(value: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in value.char_indices() {
        match c {
            '|' if !escaped => return Some(i),
            '\\' => escaped = !escaped,
            _ => escaped = false,
        }
    }
    None
}

/// Parses submitted selection values, ignoring empty ones.
pub fn parse_selections<'a>(values: impl IntoIterator<Item = &'a str>) -> Result<Vec<Selection>> {
    values
        .into_iter()
        .filter(|v| !v.is_empty())
        .map(Selection::parse)
        .collect()
}

/// Builds a deflate-compressed ZIP of the selected tracks, each stored under
/// its canonical file name. Repeated selections are stored once.
///
/// Every selection is checked before anything is written: if one or more
/// files are not in `dir` the call fails with `Error::MissingFile` listing
/// all of them, and no partial archive is produced.
pub async fn build_zip(dir: &Path, selections: &[Selection]) -> Result<Vec<u8>> {
    if selections.is_empty() {
        return Err(Error::Validation("No songs selected.".to_string()));
    }

    let mut entries = Vec::with_capacity(selections.len());
    let mut missing = Vec::new();
    let mut seen = HashSet::new();
    for selection in selections {
        let filename = storage::track_filename(&selection.title, &selection.artist)?;
        if !seen.insert(filename.clone()) {
            continue;
        }
        match storage::existing_track(dir, &selection.title, &selection.artist).await? {
            Some(path) => entries.push((filename, path)),
            None => missing.push(filename),
        }
    }

    if !missing.is_empty() {
        return Err(Error::MissingFile(missing));
    }

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (filename, path) in entries {
        let bytes = async_fs::read(&path).await?;
        zip.start_file(filename, options)?;
        zip.write_all(&bytes)?;
    }

    Ok(zip.finish()?.into_inner())
}
