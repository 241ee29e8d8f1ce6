use url::Url;

#[derive(Debug, Clone)]
pub struct FetchResult {
    pub url: Url,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchResult {
    pub fn new(url: Url, status_code: u16, body: Vec<u8>) -> Self {
        Self {
            url,
            status_code,
            content_type: None,
            body,
        }
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Whether the response declared an HTML media type. Missing headers
    /// count as HTML.
    pub fn is_html(&self) -> bool {
        self.content_type.as_deref().is_none_or(|ct| {
            let essence = ct.split(';').next().unwrap_or(ct).trim();
            essence.eq_ignore_ascii_case("text/html")
                || essence.eq_ignore_ascii_case("application/xhtml+xml")
        })
    }
}
