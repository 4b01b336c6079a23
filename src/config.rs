use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Provider used for extraction and chat when not specified
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Structured extraction settings
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Conversational assistant settings
    #[serde(default)]
    pub chat: ChatConfig,
    /// Web scraper settings
    #[serde(default)]
    pub scraper: ScraperConfig,
    /// Illustration generator settings
    #[serde(default)]
    pub illustration: IllustrationConfig,
    /// Input classifier thresholds
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// LLM request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: HashMap::new(),
            extraction: ExtractionConfig::default(),
            chat: ChatConfig::default(),
            scraper: ScraperConfig::default(),
            illustration: IllustrationConfig::default(),
            classifier: ClassifierConfig::default(),
            timeout: default_timeout(),
        }
    }
}

/// Configuration for a specific LLM provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    pub enabled: bool,
    /// Model identifier (e.g., "gpt-4o")
    pub model: String,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
    /// Resource endpoint (Azure OpenAI specific)
    pub endpoint: Option<String>,
    /// Deployment name (Azure OpenAI specific)
    pub deployment_name: Option<String>,
    /// API version (Azure OpenAI specific)
    pub api_version: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExtractionConfig {
    #[serde(default = "default_extraction_temperature")]
    pub temperature: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            temperature: default_extraction_temperature(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    #[serde(default = "default_chat_temperature")]
    pub temperature: f32,
    /// Number of most recent turns forwarded to the model
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            temperature: default_chat_temperature(),
            history_window: default_history_window(),
        }
    }
}

/// Fetch policy and extraction bounds for the web scraper
#[derive(Debug, Deserialize, Clone)]
pub struct ScraperConfig {
    /// Per-attempt timeout in seconds
    #[serde(default = "default_scrape_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// Pause before switching identity after a 403
    #[serde(default = "default_blocked_retry_delay_ms")]
    pub blocked_retry_delay_ms: u64,
    /// Below this many characters the scrape fails with InsufficientContent
    #[serde(default = "default_min_content_length")]
    pub min_content_length: usize,
    /// Below this many characters the assembled text is replaced by the container text
    #[serde(default = "default_structured_min_length")]
    pub structured_min_length: usize,
    #[serde(default = "default_max_ingredient_len")]
    pub max_ingredient_len: usize,
    #[serde(default = "default_max_instruction_len")]
    pub max_instruction_len: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_scrape_timeout(),
            max_redirects: default_max_redirects(),
            blocked_retry_delay_ms: default_blocked_retry_delay_ms(),
            min_content_length: default_min_content_length(),
            structured_min_length: default_structured_min_length(),
            max_ingredient_len: default_max_ingredient_len(),
            max_instruction_len: default_max_instruction_len(),
        }
    }
}

/// Configuration for the image generation backend
#[derive(Debug, Deserialize, Clone)]
pub struct IllustrationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_image_model")]
    pub model: String,
    /// Falls back to GOOGLE_AI_API_KEY, then GEMINI_API_KEY
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Directory the generated images are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Public URL prefix under which `output_dir` is served
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
}

impl Default for IllustrationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: default_image_model(),
            api_key: None,
            base_url: None,
            output_dir: default_output_dir(),
            url_prefix: default_url_prefix(),
        }
    }
}

/// Heuristic thresholds for telling recipes apart from chat messages
#[derive(Debug, Deserialize, Clone)]
pub struct ClassifierConfig {
    /// Minimum length when both ingredient and instruction signals are present
    #[serde(default = "default_recipe_min_length")]
    pub recipe_min_length: usize,
    #[serde(default = "default_keyword_min_count")]
    pub keyword_min_count: usize,
    /// Minimum length for the keyword-density rule
    #[serde(default = "default_keyword_min_length")]
    pub keyword_min_length: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            recipe_min_length: default_recipe_min_length(),
            keyword_min_count: default_keyword_min_count(),
            keyword_min_length: default_keyword_min_length(),
        }
    }
}

// Default value functions
fn default_provider() -> String {
    "openai".to_string()
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_extraction_temperature() -> f32 {
    0.3
}

fn default_chat_temperature() -> f32 {
    0.7
}

fn default_history_window() -> usize {
    10
}

fn default_timeout() -> u64 {
    60
}

fn default_scrape_timeout() -> u64 {
    15
}

fn default_max_redirects() -> usize {
    5
}

fn default_blocked_retry_delay_ms() -> u64 {
    1000
}

fn default_min_content_length() -> usize {
    50
}

fn default_structured_min_length() -> usize {
    100
}

fn default_max_ingredient_len() -> usize {
    200
}

fn default_max_instruction_len() -> usize {
    500
}

fn default_true() -> bool {
    true
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image-preview".to_string()
}

fn default_output_dir() -> String {
    "public/images".to_string()
}

fn default_url_prefix() -> String {
    "/images".to_string()
}

fn default_recipe_min_length() -> usize {
    100
}

fn default_keyword_min_count() -> usize {
    4
}

fn default_keyword_min_length() -> usize {
    150
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with CARDAMOM__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: CARDAMOM__PROVIDERS__OPENAI__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Provider configuration for the default provider, if present
    pub fn default_provider_config(&self) -> Option<&ProviderConfig> {
        self.providers.get(&self.default_provider)
    }
}

/// Load configuration from file and environment variables
///
/// See [`AppConfig::load`] for the precedence rules.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: CARDAMOM__SCRAPER__TIMEOUT_SECS
        .add_source(
            Environment::with_prefix("CARDAMOM")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
