use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP status {status} for {url}")]
    StatusError { url: String, status: u16 },
}

impl FetchError {
    /// Status code of the response, when the server answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchError::HttpError(e) => e.status().map(|s| s.as_u16()),
            FetchError::StatusError { status, .. } => Some(*status),
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
