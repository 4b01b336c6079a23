//! Content normalizer: every submission becomes a single recipe text.

pub mod file;
pub mod text;
pub mod url;

use crate::blob_store::BlobStore;
use crate::classify::parse_http_url;
use crate::error::FlowError;
use crate::model::ScrapedRecipe;
use crate::url_to_text::Scraper;
use std::path::PathBuf;

/// A raw submission before normalization
#[derive(Debug, Clone)]
pub enum RawSubmission {
    /// Pasted text; an absolute http(s) URL here is scraped
    Text(String),
    /// Temporary upload, deleted once read
    File(PathBuf),
    Url(String),
}

/// Recipe text ready for extraction, plus the scraped page it came from
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedInput {
    pub text: String,
    pub source: Option<ScrapedRecipe>,
}

impl NormalizedInput {
    fn plain(text: String) -> Self {
        Self { text, source: None }
    }

    fn scraped(recipe: ScrapedRecipe) -> Self {
        Self {
            text: recipe.content.clone(),
            source: Some(recipe),
        }
    }
}

pub async fn normalize(
    submission: RawSubmission,
    scraper: &Scraper,
    store: &dyn BlobStore,
) -> Result<NormalizedInput, FlowError> {
    match submission {
        RawSubmission::Text(raw) => match parse_http_url(&raw) {
            Some(link) => url::process(scraper, link.as_str())
                .await
                .map(NormalizedInput::scraped),
            None => text::process(&raw).map(NormalizedInput::plain),
        },
        RawSubmission::File(path) => file::process(store, &path)
            .await
            .map(NormalizedInput::plain),
        RawSubmission::Url(link) => {
            if link.trim().is_empty() {
                return Err(FlowError::InvalidInput("URL is required".to_string()));
            }
            url::process(scraper, &link)
                .await
                .map(NormalizedInput::scraped)
        }
    }
}
