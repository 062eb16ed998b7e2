use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Errors produced by the import, storage and archive operations.
///
/// The import loop recovers `NotFound`, `Fetch` and per-track `Validation`
/// errors and reports them as failed tracks. Everything returned from
/// [`crate::archive::build_zip`] propagates to the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad playlist link, bad form input or a name that cannot be stored.
    #[error("{0}")]
    Validation(String),

    /// The metadata or search API failed or returned an unusable payload.
    #[error("upstream request failed: {0}")]
    Upstream(String),

    /// The video index returned no result for a query.
    #[error("no video found for \"{0}\"")]
    NotFound(String),

    /// No audio stream, network failure or write failure while fetching.
    #[error("failed to fetch {title} by {artist}: {reason}")]
    Fetch {
        title: String,
        artist: String,
        reason: String,
    },

    /// Files selected for an archive are not present in the downloads directory.
    #[error("selected songs are not downloaded: {}", .0.join(", "))]
    MissingFile(Vec<String>),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("catalog store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Upstream(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Auth(_) => StatusCode::UNAUTHORIZED,
            Error::NotFound(_) | Error::MissingFile(_) => StatusCode::NOT_FOUND,
            Error::Upstream(_) => StatusCode::BAD_GATEWAY,
            Error::Fetch { .. } | Error::Store(_) | Error::Io(_) | Error::Zip(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
