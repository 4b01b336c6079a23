use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};

use crate::blob_store::FsBlobStore;
use crate::chat::CookingAssistant;
use crate::classify::{classify, InputKind};
use crate::config::AppConfig;
use crate::error::FlowError;
use crate::extraction::RecipeExtractor;
use crate::illustration::Illustrator;
use crate::model::{ConversationTurn, RecipeResult};
use crate::pipelines::{self, NormalizedInput, RawSubmission};
use crate::providers::{implicit_openai_config, LlmError, LlmProvider, ProviderFactory};
use crate::url_to_text::Scraper;

/// Represents the input source for a submission
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Free input, classified as URL, recipe text or chat
    Input(String),
    /// Recipe text (an http(s) URL here is still scraped)
    Text(String),
    /// Recipe page to scrape
    Url(String),
    /// Temporary uploaded file, deleted once read
    File(PathBuf),
    /// Message for the cooking assistant
    Chat(String),
}

/// Result of a submission
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Recipe(RecipeResult),
    Chat(String),
}

/// Submission source once any upload has been read and removed
enum Pending {
    Source(InputSource),
    Upload(String),
}

/// Builder for configuring and running a submission
#[derive(Default)]
pub struct RecipeFlowBuilder {
    source: Option<InputSource>,
    history: Vec<ConversationTurn>,
    config: Option<AppConfig>,
    provider: Option<Arc<dyn LlmProvider>>,
    illustrator: Option<Illustrator>,
    skip_illustration: bool,
    timeout: Option<Duration>,
    api_key: Option<String>,
    model: Option<String>,
}

impl RecipeFlowBuilder {
    /// Free-form input, routed by the input classifier
    ///
    /// # Example
    /// ```
    /// use cardamom::RecipeFlow;
    ///
    /// let builder = RecipeFlow::builder()
    ///     .input("https://example.com/recipes/pancakes");
    /// ```
    pub fn input(mut self, input: impl Into<String>) -> Self {
        self.source = Some(InputSource::Input(input.into()));
        self
    }

    /// Recipe text to turn into a flowchart
    ///
    /// # Example
    /// ```
    /// use cardamom::RecipeFlow;
    ///
    /// let builder = RecipeFlow::builder()
    ///     .text("Pancakes\n\nIngredients: 2 eggs, 1 cup flour\nInstructions: whisk and fry");
    /// ```
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.source = Some(InputSource::Text(text.into()));
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.source = Some(InputSource::Url(url.into()));
        self
    }

    /// Uploaded file; it is deleted after reading whatever the outcome
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(InputSource::File(path.into()));
        self
    }

    /// Message for the cooking assistant, skipping classification
    pub fn chat(mut self, message: impl Into<String>) -> Self {
        self.source = Some(InputSource::Chat(message.into()));
        self
    }

    /// Earlier turns of the conversation, oldest first
    pub fn history(mut self, history: Vec<ConversationTurn>) -> Self {
        self.history = history;
        self
    }

    /// Use `config` instead of loading `config.toml` and the environment
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use an already constructed LLM provider
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn illustrator(mut self, illustrator: Illustrator) -> Self {
        self.illustrator = Some(illustrator);
        self
    }

    pub fn without_illustration(mut self) -> Self {
        self.skip_illustration = true;
        self
    }

    /// Timeout for LLM and image requests
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// API key for the default provider
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Model for the default provider
    ///
    /// # Example
    /// ```
    /// use cardamom::RecipeFlow;
    ///
    /// let builder = RecipeFlow::builder()
    ///     .chat("How do I temper chocolate?")
    ///     .model("gpt-4o-mini");
    /// ```
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Run the submission
    ///
    /// # Errors
    /// Returns `FlowError` if:
    /// - No input source was specified or the input is empty
    /// - Scraping fails
    /// - Extraction or chat fails
    ///
    /// # Example
    /// ```no_run
    /// # use cardamom::{Outcome, RecipeFlow};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// match RecipeFlow::builder().input("https://example.com/recipe").build().await? {
    ///     Outcome::Recipe(recipe) => println!("{}", recipe.mermaid_diagram),
    ///     Outcome::Chat(reply) => println!("{}", reply),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(mut self) -> Result<Outcome, FlowError> {
        let source = self.source.take().ok_or_else(|| {
            FlowError::InvalidInput(
                "No input source specified. Use .input(), .text(), .url(), .file() or .chat()"
                    .to_string(),
            )
        })?;

        // Uploads are consumed first so no later setup failure leaves them on disk
        let pending = match source {
            InputSource::File(path) => {
                Pending::Upload(pipelines::file::process(&FsBlobStore, &path).await?)
            }
            other => Pending::Source(other),
        };

        let config = match self.config.take() {
            Some(config) => config,
            None => AppConfig::load()?,
        };

        let input = match pending {
            Pending::Upload(text) => NormalizedInput { text, source: None },
            Pending::Source(source) => {
                let source = match source {
                    InputSource::Input(raw) => match classify(&raw, &config.classifier) {
                        InputKind::Url(url) => InputSource::Url(url.to_string()),
                        InputKind::RecipeText => InputSource::Text(raw),
                        InputKind::Chat => InputSource::Chat(raw),
                    },
                    other => other,
                };
                debug!("Dispatching {:?}", source);

                let submission = match source {
                    InputSource::Chat(message) => {
                        let reply = self.chat_reply(&config, &message).await?;
                        return Ok(Outcome::Chat(reply));
                    }
                    InputSource::Text(text) | InputSource::Input(text) => RawSubmission::Text(text),
                    InputSource::Url(url) => RawSubmission::Url(url),
                    InputSource::File(path) => RawSubmission::File(path),
                };

                let scraper = Scraper::new(&config.scraper)?;
                pipelines::normalize(submission, &scraper, &FsBlobStore).await?
            }
        };

        let provider = self
            .resolve_provider(&config)
            .map_err(|e| FlowError::ExtractionFailed(e.to_string()))?;
        let mut extractor = RecipeExtractor::new(provider, config.extraction.temperature);
        if let Some(illustrator) = self.resolve_illustrator(&config) {
            extractor = extractor.with_illustrator(illustrator);
        }

        let mut recipe = extractor.extract(&input.text).await?;
        if let Some(page) = input.source {
            recipe.original_url = Some(page.url);
            recipe.scraped_title = Some(page.title);
        }

        info!("Built flowchart for '{}'", recipe.recipe_name);
        Ok(Outcome::Recipe(recipe))
    }

    async fn chat_reply(&mut self, config: &AppConfig, message: &str) -> Result<String, FlowError> {
        if message.trim().is_empty() {
            return Err(FlowError::InvalidInput("Message is required".to_string()));
        }
        let provider = self
            .resolve_provider(config)
            .map_err(|e| FlowError::ChatFailed(e.to_string()))?;
        let assistant =
            CookingAssistant::new(provider, config.chat.temperature, config.chat.history_window);
        assistant.chat(message, &self.history).await
    }

    fn llm_timeout(&self, config: &AppConfig) -> Duration {
        self.timeout
            .unwrap_or_else(|| Duration::from_secs(config.timeout))
    }

    fn resolve_provider(&mut self, config: &AppConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
        if let Some(provider) = self.provider.take() {
            return Ok(provider);
        }

        let mut config = config.clone();
        config.timeout = self.llm_timeout(&config).as_secs();

        if self.api_key.is_some() || self.model.is_some() {
            let provider_config = config
                .providers
                .entry(config.default_provider.clone())
                .or_insert_with(implicit_openai_config);
            if let Some(key) = self.api_key.take() {
                provider_config.api_key = Some(key);
            }
            if let Some(model) = self.model.take() {
                provider_config.model = model;
            }
        }

        ProviderFactory::get_default_provider(&config).map(Arc::from)
    }

    fn resolve_illustrator(&mut self, config: &AppConfig) -> Option<Illustrator> {
        if self.skip_illustration {
            return None;
        }
        if let Some(illustrator) = self.illustrator.take() {
            return Some(illustrator);
        }
        config
            .illustration
            .enabled
            .then(|| Illustrator::from_config(&config.illustration, self.llm_timeout(config)))
    }
}

/// Main entry point for the builder API
pub struct RecipeFlow;

impl RecipeFlow {
    /// Creates a new builder
    ///
    /// # Example
    /// ```
    /// use cardamom::RecipeFlow;
    ///
    /// let builder = RecipeFlow::builder();
    /// ```
    pub fn builder() -> RecipeFlowBuilder {
        RecipeFlowBuilder::default()
    }
}
