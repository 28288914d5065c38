use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid settings file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("query request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("query returned no data: {0}")]
    EmptyResponse(String),

    #[error("invalid settings: {0}")]
    Settings(String),

    #[error("dataset `{0}` is not one of the known datasets")]
    UnknownDataset(String),

    #[error("invalid color `{0}`, expected #rgb or #rrggbb")]
    InvalidColor(String),

    #[error("backend channel closed")]
    BackendClosed,

    #[error("failed to initialize logging: {0}")]
    Logging(String),
}
