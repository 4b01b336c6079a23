//! Web scraper: fetch a recipe page and reduce it to recipe text.

pub mod fetchers;
pub mod html;

use crate::config::ScraperConfig;
use crate::error::FlowError;
use crate::model::ScrapedRecipe;
use fetchers::RequestFetcher;
use log::{debug, info};
use reqwest::Url;

pub struct Scraper {
    fetcher: RequestFetcher,
    config: ScraperConfig,
}

impl Scraper {
    pub fn new(config: &ScraperConfig) -> Result<Self, FlowError> {
        Ok(Self {
            fetcher: RequestFetcher::new(config)?,
            config: config.clone(),
        })
    }

    pub fn with_fetcher(fetcher: RequestFetcher, config: &ScraperConfig) -> Self {
        Self {
            fetcher,
            config: config.clone(),
        }
    }

    /// Fetch `url` and extract its title and recipe text.
    ///
    /// Non-http(s) URLs fail before any request is made.
    pub async fn scrape(&self, url: &str) -> Result<ScrapedRecipe, FlowError> {
        let url = validate_url(url)?;
        info!("Scraping {}", url);

        let body = self.fetcher.fetch(&url).await?;
        let content = html::extract_content(&body, &self.config);

        let length = content.text.chars().count();
        if length < self.config.min_content_length {
            return Err(FlowError::InsufficientContent { length });
        }

        info!("Extracted {} characters of recipe text", length);
        debug!(
            "Recipe preview: {}",
            content.text.chars().take(200).collect::<String>()
        );

        Ok(ScrapedRecipe {
            title: content.title,
            content: content.text,
            url: url.to_string(),
        })
    }
}

/// Parse and check the scheme of a URL to scrape
pub fn validate_url(url: &str) -> Result<Url, FlowError> {
    let parsed = Url::parse(url.trim())
        .map_err(|e| FlowError::InvalidInput(format!("Invalid URL format: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(FlowError::InvalidProtocol(scheme.to_string())),
    }
}
