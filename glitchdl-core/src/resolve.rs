// Mapping asset URLs to local filenames

use crate::error::{ArchiveError, Result};
use percent_encoding::percent_decode_str;
use url::Url;

/// Resolve an element's `src` against the page it was found on.
/// Absolute sources are returned unchanged.
///
/// Blank, fragment-only and query-only sources, and anything else that lands
/// back on the page URL, are rejected as [`ArchiveError::PageReference`].
pub fn resolve_source(page_url: &Url, src: &str) -> Result<Url> {
    let trimmed = src.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('?') {
        return Err(ArchiveError::PageReference(src.to_string()));
    }

    let url = page_url.join(src).map_err(|source| ArchiveError::InvalidUrl {
        src: src.to_string(),
        source,
    })?;

    if without_fragment(&url) == without_fragment(page_url) {
        return Err(ArchiveError::PageReference(src.to_string()));
    }
    Ok(url)
}

fn without_fragment(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}

/// Percent-decoded final segment of the URL path. Query string and fragment
/// are ignored. Returns an empty string when the path ends in `/`.
///
/// Decoding happens before the split, so an encoded `%2F` acts as a separator.
pub fn local_filename(url: &Url) -> String {
    let decoded = percent_decode_str(url.path()).decode_utf8_lossy();
    match decoded.rsplit_once('/') {
        Some((_, name)) => name.to_string(),
        None => decoded.into_owned(),
    }
}

/// Like [`local_filename`], but rejects names that cannot be written inside
/// the assets directory.
pub fn checked_filename(url: &Url) -> Result<String> {
    let name = local_filename(url);
    if name.is_empty() || name == "." || name == ".." {
        return Err(ArchiveError::InvalidFilename(url.to_string()));
    }
    Ok(name)
}
