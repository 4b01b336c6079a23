use super::{ImageGenerator, IllustrationError};
use crate::config::IllustrationConfig;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Image generation through the Gemini `generateContent` API
pub struct GeminiImageGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiImageGenerator {
    /// Build from configuration, falling back to GOOGLE_AI_API_KEY then GEMINI_API_KEY
    pub fn new(config: &IllustrationConfig, timeout: Duration) -> Result<Self, IllustrationError> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_AI_API_KEY").ok())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or(IllustrationError::NoCredential)?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IllustrationError::Request(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config.model.clone(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
            model,
        }
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageGenerator {
    async fn generate(&self, prompt: &str) -> Result<Option<Vec<u8>>, IllustrationError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "contents": [{
                    "parts": [{ "text": prompt }]
                }],
                "generationConfig": {
                    "responseModalities": ["TEXT", "IMAGE"]
                }
            }))
            .send()
            .await
            .map_err(|e| IllustrationError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IllustrationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| IllustrationError::Request(e.to_string()))?;

        first_inline_image(&body)
    }
}

/// Decode the first `inlineData` part of the first candidate, if any
fn first_inline_image(body: &Value) -> Result<Option<Vec<u8>>, IllustrationError> {
    let parts = body["candidates"][0]["content"]["parts"]
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or_default();

    for part in parts {
        if let Some(data) = part["inlineData"]["data"].as_str() {
            debug!(
                "Received inline image ({})",
                part["inlineData"]["mimeType"].as_str().unwrap_or("unknown type")
            );
            let bytes = STANDARD
                .decode(data)
                .map_err(|e| IllustrationError::Decode(e.to_string()))?;
            return Ok(Some(bytes));
        }
    }

    Ok(None)
}
