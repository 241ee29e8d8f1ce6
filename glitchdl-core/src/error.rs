use glitchdl_fetch::FetchError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Error fetching {url}: {source}")]
    PageFetchError {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("Fetch failed: {0}")]
    FetchError(#[from] FetchError),

    #[error("Invalid URL '{src}': {source}")]
    InvalidUrl {
        src: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Source '{0}' refers to the page itself, not an asset")]
    PageReference(String),

    #[error("Cannot derive a local filename from {0}")]
    InvalidFilename(String),

    #[error("Failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
