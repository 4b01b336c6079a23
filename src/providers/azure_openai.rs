use crate::config::ProviderConfig;
use crate::providers::{read_chat_response, CompletionRequest, LlmError, LlmProvider};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

pub struct AzureOpenAIProvider {
    client: Client,
    api_key: String,
    endpoint: String,
    deployment_name: String,
    api_version: String,
    max_tokens: u32,
}

impl AzureOpenAIProvider {
    /// Create a new Azure OpenAI provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, LlmError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("AZURE_OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                LlmError::NotConfigured(
                    "AZURE_OPENAI_API_KEY not found in config or environment".to_string(),
                )
            })?;

        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| LlmError::NotConfigured("Azure OpenAI endpoint is required".into()))?;

        let deployment_name = config.deployment_name.clone().ok_or_else(|| {
            LlmError::NotConfigured("Azure OpenAI deployment_name is required".into())
        })?;

        // Structured outputs need 2024-08-01-preview or later
        let api_version = config
            .api_version
            .clone()
            .unwrap_or_else(|| "2024-08-01-preview".to_string());

        Ok(AzureOpenAIProvider {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            endpoint,
            deployment_name,
            api_version,
            max_tokens: config.max_tokens,
        })
    }

    fn completions_url(&self) -> String {
        // https://{endpoint}/openai/deployments/{deployment-name}/chat/completions?api-version={api-version}
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment_name,
            self.api_version
        )
    }
}

#[async_trait]
impl LlmProvider for AzureOpenAIProvider {
    fn provider_name(&self) -> &str {
        "azure_openai"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        debug!("Sending completion to Azure deployment {}", self.deployment_name);

        // The deployment selects the model, so the body carries none
        let response = self
            .client
            .post(self.completions_url())
            .header("api-key", &self.api_key)
            .json(&request.to_chat_body(None, self.max_tokens))
            .send()
            .await?;

        read_chat_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn config(endpoint: &str) -> ProviderConfig {
        ProviderConfig {
            enabled: true,
            model: "gpt-4o".to_string(),
            max_tokens: 2000,
            api_key: Some("test-key".to_string()),
            base_url: None,
            endpoint: Some(endpoint.to_string()),
            deployment_name: Some("flowcharts".to_string()),
            api_version: None,
        }
    }

    #[test]
    fn test_provider_name() {
        let provider =
            AzureOpenAIProvider::new(&config("https://test.openai.azure.com"), Duration::from_secs(5))
                .unwrap();
        assert_eq!(provider.provider_name(), "azure_openai");
    }

    #[test]
    fn test_missing_deployment() {
        let mut config = config("https://test.openai.azure.com");
        config.deployment_name = None;
        let result = AzureOpenAIProvider::new(&config, Duration::from_secs(5));
        assert!(matches!(result, Err(LlmError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_complete() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/openai/deployments/flowcharts/chat/completions")
            .match_query(Matcher::UrlEncoded(
                "api-version".into(),
                "2024-08-01-preview".into(),
            ))
            .match_header("api-key", "test-key")
            .with_status(200)
            .with_body(r#"{"choices": [{"message": {"content": "Hello from Azure"}}]}"#)
            .create_async()
            .await;

        let provider =
            AzureOpenAIProvider::new(&config(&format!("{}/", server.url())), Duration::from_secs(5))
                .unwrap();
        let request = CompletionRequest::new("system", "user", 0.7);

        assert_eq!(provider.complete(&request).await.unwrap(), "Hello from Azure");
        mock.assert_async().await;
    }
}
