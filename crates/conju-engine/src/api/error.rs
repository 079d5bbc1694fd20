use thiserror::Error;

/// Failure while fetching a batch of puzzles.
///
/// An empty batch is not an error; sources return `Ok(vec![])` when no
/// puzzle matches the filter.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("could not decode puzzle batch: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no puzzle source configured")]
    Unavailable,
}

/// Failure while loading an offline dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dataset contains no verbs")]
    Empty,
}

/// Failure while reading stored preferences.
#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("stored preference `{key}` is malformed: {source}")]
    Json {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored language `{0}` is not supported")]
    UnknownLanguage(String),
}
