use crate::config::{AppConfig, ProviderConfig};
use crate::providers::{AzureOpenAIProvider, LlmError, LlmProvider, OpenAIProvider};
use std::time::Duration;

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
        timeout: Duration,
    ) -> Result<Box<dyn LlmProvider>, LlmError> {
        // Validate that provider is enabled
        if !config.enabled {
            return Err(LlmError::NotConfigured(format!(
                "Provider '{}' is not enabled in configuration",
                provider_name
            )));
        }

        match provider_name {
            "openai" => Ok(Box::new(OpenAIProvider::new(config, timeout)?)),
            "azure_openai" => Ok(Box::new(AzureOpenAIProvider::new(config, timeout)?)),
            _ => Err(LlmError::NotConfigured(format!(
                "Unknown provider: {} (available: {})",
                provider_name,
                Self::available_providers().join(", ")
            ))),
        }
    }

    /// Get the default provider from configuration
    ///
    /// With no provider section at all, an OpenAI provider using `gpt-4o`
    /// and the `OPENAI_API_KEY` environment variable is created.
    pub fn get_default_provider(config: &AppConfig) -> Result<Box<dyn LlmProvider>, LlmError> {
        let timeout = Duration::from_secs(config.timeout);
        let provider_name = &config.default_provider;

        match config.default_provider_config() {
            Some(provider_config) => Self::create(provider_name, provider_config, timeout),
            None if config.providers.is_empty() && provider_name == "openai" => {
                Self::create("openai", &implicit_openai_config(), timeout)
            }
            None => Err(LlmError::NotConfigured(format!(
                "Default provider '{}' not found in configuration",
                provider_name
            ))),
        }
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["openai", "azure_openai"]
    }
}

pub(crate) fn implicit_openai_config() -> ProviderConfig {
    ProviderConfig {
        enabled: true,
        model: "gpt-4o".to_string(),
        max_tokens: 4000,
        api_key: None,
        base_url: None,
        endpoint: None,
        deployment_name: None,
        api_version: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn create_test_provider_config() -> ProviderConfig {
        ProviderConfig {
            enabled: true,
            model: "test-model".to_string(),
            max_tokens: 2000,
            api_key: Some("test-key".to_string()),
            base_url: None,
            endpoint: None,
            deployment_name: None,
            api_version: None,
        }
    }

    fn timeout() -> Duration {
        Duration::from_secs(5)
    }

    #[test]
    fn test_create_openai_provider() {
        let config = create_test_provider_config();
        let provider = ProviderFactory::create("openai", &config, timeout()).unwrap();
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_create_azure_provider() {
        let mut config = create_test_provider_config();
        config.endpoint = Some("https://test.openai.azure.com".to_string());
        config.deployment_name = Some("gpt-4o".to_string());

        let provider = ProviderFactory::create("azure_openai", &config, timeout()).unwrap();
        assert_eq!(provider.provider_name(), "azure_openai");
    }

    #[test]
    fn test_create_unknown_provider() {
        let config = create_test_provider_config();
        let result = ProviderFactory::create("unknown", &config, timeout());
        assert!(result.is_err());
        if let Err(e) = result {
            let message = e.to_string();
            assert!(message.contains("Unknown provider"));
            assert!(message.contains("available: openai, azure_openai"));
        }
    }

    #[test]
    fn test_create_disabled_provider() {
        let mut config = create_test_provider_config();
        config.enabled = false;

        let result = ProviderFactory::create("openai", &config, timeout());
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("not enabled in configuration"));
        }
    }

    #[test]
    fn test_get_default_provider() {
        let mut providers = HashMap::new();
        providers.insert("openai".to_string(), create_test_provider_config());

        let app_config = AppConfig {
            providers,
            ..Default::default()
        };

        let provider = ProviderFactory::get_default_provider(&app_config).unwrap();
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_get_default_provider_not_found() {
        let mut providers = HashMap::new();
        providers.insert("openai".to_string(), create_test_provider_config());

        let app_config = AppConfig {
            default_provider: "azure_openai".to_string(),
            providers,
            ..Default::default()
        };

        let result = ProviderFactory::get_default_provider(&app_config);
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("not found"));
        }
    }

    #[test]
    fn test_available_providers() {
        let providers = ProviderFactory::available_providers();
        assert_eq!(providers.len(), 2);
        assert!(providers.contains(&"openai"));
        assert!(providers.contains(&"azure_openai"));
    }
}
