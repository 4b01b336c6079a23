use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};

/// Headers sent with every identity, mimicking a top-level browser navigation.
///
/// `Accept-Encoding` is left to the HTTP client so bodies are always decodable.
const BROWSER_HEADERS: &[(&str, &str)] = &[
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8",
    ),
    ("accept-language", "en-US,en;q=0.9"),
    ("dnt", "1"),
    ("upgrade-insecure-requests", "1"),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "none"),
    ("cache-control", "max-age=0"),
];

/// A browser persona the scraper presents to a site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProfile {
    pub name: &'static str,
    pub user_agent: &'static str,
}

impl IdentityProfile {
    pub const fn new(name: &'static str, user_agent: &'static str) -> Self {
        Self { name, user_agent }
    }

    /// User agent plus the shared browser header set
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(self.user_agent));
        for &(name, value) in BROWSER_HEADERS {
            headers.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
        headers
    }
}

/// Identities tried in order until one is not refused
pub const DEFAULT_IDENTITIES: &[IdentityProfile] = &[
    IdentityProfile::new(
        "chrome-windows",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    ),
    IdentityProfile::new(
        "chrome-macos",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    ),
    IdentityProfile::new(
        "firefox-windows",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    ),
    IdentityProfile::new(
        "safari-macos",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    ),
];
