use crate::error::FlowError;
use crate::model::ScrapedRecipe;
use crate::url_to_text::Scraper;
use log::error;

/// Scrape `url`, logging the classified failure before handing it back
pub async fn process(scraper: &Scraper, url: &str) -> Result<ScrapedRecipe, FlowError> {
    scraper.scrape(url).await.map_err(|e| {
        error!("Scraping {} failed: {}", url, e);
        e
    })
}
