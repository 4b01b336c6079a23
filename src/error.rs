use thiserror::Error;

/// Errors that can occur while turning a submission into a recipe flowchart
/// or answering a chat message
#[derive(Error, Debug)]
pub enum FlowError {
    /// Missing or empty text, malformed URL, unreadable upload
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// URL scheme other than http/https
    #[error("Invalid URL protocol '{0}'. Only HTTP and HTTPS are supported.")]
    InvalidProtocol(String),

    /// Site refused every identity profile with 403
    #[error("Access denied (403 Forbidden). This website blocks automated requests. Please try copying and pasting the recipe text directly instead.")]
    ScrapeBlocked,

    /// Site answered 429
    #[error("Too many requests (429). The website is rate limiting requests. Please wait a moment and try again.")]
    ScrapeRateLimited,

    /// Site answered 404
    #[error("Recipe not found (404). The URL may be incorrect or the recipe may have been removed.")]
    ScrapeNotFound,

    /// Site answered 5xx
    #[error("Server error ({0}). The website is experiencing issues. Please try again later.")]
    ScrapeUpstreamError(u16),

    /// DNS failure or refused connection
    #[error("Could not connect to the URL. Please check if the URL is correct and accessible.")]
    ScrapeConnection,

    /// Attempt exceeded the per-request timeout
    #[error("Request timeout. The website took too long to respond.")]
    ScrapeTimeout,

    /// Any other scrape failure
    #[error("Failed to scrape recipe from URL: {0}")]
    ScrapeFailed(String),

    /// Page fetched but the extracted text is too short to be a recipe
    #[error("Could not extract sufficient recipe content from the URL ({length} characters). The page may not contain a recipe or may be protected.")]
    InsufficientContent { length: usize },

    /// LLM call or structured parse failed during extraction
    #[error("Failed to process recipe: {0}")]
    ExtractionFailed(String),

    /// LLM call failed during conversation
    #[error("Failed to process chat message: {0}")]
    ChatFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Local filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FlowError {
    /// True for every error raised by the web scraper
    pub fn is_scrape_error(&self) -> bool {
        matches!(
            self,
            FlowError::InvalidProtocol(_)
                | FlowError::ScrapeBlocked
                | FlowError::ScrapeRateLimited
                | FlowError::ScrapeNotFound
                | FlowError::ScrapeUpstreamError(_)
                | FlowError::ScrapeConnection
                | FlowError::ScrapeTimeout
                | FlowError::ScrapeFailed(_)
                | FlowError::InsufficientContent { .. }
        )
    }
}
