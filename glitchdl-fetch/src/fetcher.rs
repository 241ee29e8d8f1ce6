use crate::error::{FetchError, Result};
use crate::result::FetchResult;
use reqwest::blocking::Client;
use tracing::debug;
use url::Url;

/// Blocking HTTP GET client. Each call to [`Fetcher::fetch`] is exactly one
/// attempt; there is no retry.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        // Transport defaults only: no user agent, cookies or custom timeout.
        let client = Client::builder().build()?;
        Ok(Self { client })
    }

    pub fn fetch(&self, url: &Url) -> Result<FetchResult> {
        debug!("Fetching {}", url);

        let response = self.client.get(url.clone()).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::StatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response.bytes()?.to_vec();

        debug!(
            "Fetched {} ({}, {}, {} bytes)",
            url,
            status.as_u16(),
            content_type.as_deref().unwrap_or("no content type"),
            body.len()
        );

        let mut result = FetchResult::new(url.clone(), status.as_u16(), body);
        result.content_type = content_type;
        Ok(result)
    }
}
