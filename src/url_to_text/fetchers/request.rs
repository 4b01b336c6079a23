use super::identity::{IdentityProfile, DEFAULT_IDENTITIES};
use crate::config::ScraperConfig;
use crate::error::FlowError;
use log::{debug, info, warn};
use reqwest::{redirect, Client, StatusCode, Url};
use std::time::{Duration, Instant};

/// Fetches a page, rotating browser identities while the site answers 403
pub struct RequestFetcher {
    client: Client,
    identities: Vec<IdentityProfile>,
    blocked_retry_delay: Duration,
}

impl RequestFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self, FlowError> {
        Self::with_identities(config, DEFAULT_IDENTITIES.to_vec())
    }

    pub fn with_identities(
        config: &ScraperConfig,
        identities: Vec<IdentityProfile>,
    ) -> Result<Self, FlowError> {
        if identities.is_empty() {
            return Err(FlowError::InvalidInput(
                "at least one identity profile is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| FlowError::ScrapeFailed(e.to_string()))?;

        Ok(Self {
            client,
            identities,
            blocked_retry_delay: Duration::from_millis(config.blocked_retry_delay_ms),
        })
    }

    /// Body of the first attempt answered with a status in [200, 400).
    ///
    /// A 403 moves on to the next identity after a short pause; any other
    /// failure ends the attempts immediately.
    pub async fn fetch(&self, url: &Url) -> Result<String, FlowError> {
        let started = Instant::now();
        let attempts = self.identities.len();

        for (index, identity) in self.identities.iter().enumerate() {
            info!(
                "Attempt {}/{} fetching {} as {}",
                index + 1,
                attempts,
                url,
                identity.name
            );

            let response = self
                .client
                .get(url.clone())
                .headers(identity.headers())
                .send()
                .await
                .map_err(transport_error)?;

            let status = response.status();
            if is_accepted(status) {
                let body = response.text().await.map_err(transport_error)?;
                info!(
                    "Fetched {} characters in {:?} (status {}, attempt {})",
                    body.len(),
                    started.elapsed(),
                    status,
                    index + 1
                );
                return Ok(body);
            }

            if status == StatusCode::FORBIDDEN && index + 1 < attempts {
                warn!("403 Forbidden as {}, trying next identity", identity.name);
                tokio::time::sleep(self.blocked_retry_delay).await;
                continue;
            }

            warn!("Attempt {} failed with status {}", index + 1, status);
            return Err(status_error(status));
        }

        // Unreachable with a non-empty identity list
        Err(FlowError::ScrapeBlocked)
    }
}

fn is_accepted(status: StatusCode) -> bool {
    (200..400).contains(&status.as_u16())
}

/// Map an HTTP status outside [200, 400) to its user-facing error
pub fn status_error(status: StatusCode) -> FlowError {
    match status.as_u16() {
        403 => FlowError::ScrapeBlocked,
        404 => FlowError::ScrapeNotFound,
        429 => FlowError::ScrapeRateLimited,
        code @ 500..=599 => FlowError::ScrapeUpstreamError(code),
        code => FlowError::ScrapeFailed(format!("unexpected status {code}")),
    }
}

fn transport_error(err: reqwest::Error) -> FlowError {
    debug!("Transport error: {:?}", err);
    if err.is_timeout() {
        FlowError::ScrapeTimeout
    } else if err.is_connect() {
        FlowError::ScrapeConnection
    } else if let Some(status) = err.status() {
        status_error(status)
    } else {
        FlowError::ScrapeFailed(err.to_string())
    }
}
