//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::DatasetError;
use storage::StorageError;
use storage::sqlite::SqliteInitError;

/// Fatal boot failures. No question can be shown after one of these; the
/// override path is the only recovery.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("HTTP {status} for {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("dataset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dataset must be a JSON array")]
    NotAnArray,
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("local dataset unusable: {0}")]
    Override(#[from] StorageError),
}

/// Errors reported when the user submits or clears an override dataset.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OverrideError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("provide a non-empty array")]
    NotANonEmptyArray,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by in-session operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no question is active")]
    NotOnQuestion,
    #[error("option {selected} does not exist (question has {available})")]
    UnknownOption { selected: usize, available: usize },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
