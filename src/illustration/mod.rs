//! Best-effort illustration of an extracted recipe.
//!
//! Every failure is absorbed: [`Illustrator::illustrate`] yields `None`
//! instead of an error so a recipe never fails because of its picture.

mod gemini;

pub use gemini::GeminiImageGenerator;

use crate::blob_store::{BlobStore, FsBlobStore};
use crate::config::IllustrationConfig;
use crate::id;
use crate::model::RecipeResult;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;

const MAX_PROMPT_INGREDIENTS: usize = 5;

#[derive(Debug, Error)]
pub enum IllustrationError {
    #[error("no image generation API key configured")]
    NoCredential,

    #[error("image request failed: {0}")]
    Request(String),

    #[error("image API returned error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("response contained no image data")]
    NoImage,

    #[error("could not decode image data: {0}")]
    Decode(String),

    #[error("could not store image: {0}")]
    Storage(#[from] std::io::Error),
}

/// Backend turning a text prompt into image bytes
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// `Ok(None)` when the model answered without an inline image
    async fn generate(&self, prompt: &str) -> Result<Option<Vec<u8>>, IllustrationError>;
}

pub struct Illustrator {
    generator: Option<Box<dyn ImageGenerator>>,
    store: Box<dyn BlobStore>,
    output_dir: PathBuf,
    url_prefix: String,
}

impl Illustrator {
    /// `generator` is `None` when no credential is available; every call then
    /// returns `None` without touching the network
    pub fn new(
        generator: Option<Box<dyn ImageGenerator>>,
        store: Box<dyn BlobStore>,
        output_dir: impl Into<PathBuf>,
        url_prefix: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            store,
            output_dir: output_dir.into(),
            url_prefix: url_prefix.into(),
        }
    }

    /// Gemini-backed illustrator writing to the local filesystem
    pub fn from_config(config: &IllustrationConfig, timeout: Duration) -> Self {
        let generator = match GeminiImageGenerator::new(config, timeout) {
            Ok(generator) => Some(Box::new(generator) as Box<dyn ImageGenerator>),
            Err(e) => {
                info!("Image generation unavailable: {}", e);
                None
            }
        };

        Self::new(
            generator,
            Box::new(FsBlobStore),
            &config.output_dir,
            config.url_prefix.clone(),
        )
    }

    /// Generate, store and return the public URL of an image for `recipe`
    pub async fn illustrate(&self, recipe: &RecipeResult) -> Option<String> {
        match self.try_illustrate(recipe).await {
            Ok(url) => {
                info!("Image generated successfully: {}", url);
                Some(url)
            }
            Err(IllustrationError::NoCredential) => {
                info!("No image generation API key found, skipping image generation");
                None
            }
            Err(e) => {
                warn!("Image generation failed, continuing without image: {}", e);
                None
            }
        }
    }

    async fn try_illustrate(&self, recipe: &RecipeResult) -> Result<String, IllustrationError> {
        let generator = self
            .generator
            .as_ref()
            .ok_or(IllustrationError::NoCredential)?;

        let prompt = build_image_prompt(recipe);
        debug!("Image prompt: {}", prompt);

        let started = Instant::now();
        let bytes = generator
            .generate(&prompt)
            .await?
            .ok_or(IllustrationError::NoImage)?;
        debug!("Image response received in {:?}", started.elapsed());

        if !self.store.exists(&self.output_dir).await {
            self.store.mkdir(&self.output_dir).await?;
        }

        let filename = image_filename();
        self.store
            .write(&self.output_dir.join(&filename), &bytes)
            .await?;

        Ok(format!(
            "{}/{}",
            self.url_prefix.trim_end_matches('/'),
            filename
        ))
    }
}

/// Art-direction prompt naming the dish and up to five ingredients
pub fn build_image_prompt(recipe: &RecipeResult) -> String {
    let mut prompt = format!(
        "Create a cute, animated illustration of {}",
        recipe.display_name("delicious dish")
    );

    let main_ingredients: Vec<&str> = recipe
        .ingredients
        .iter()
        .take(MAX_PROMPT_INGREDIENTS)
        .map(|i| i.name.as_str())
        .collect();
    if !main_ingredients.is_empty() {
        prompt.push_str(&format!(" featuring {}", main_ingredients.join(", ")));
    }

    prompt.push_str(
        ". The dish should be drawn in a kawaii, chibi style with soft colors. \
         Think Studio Ghibli meets food illustration: whimsical, charming and endearing, \
         with bright cheerful colors, rounded shapes and a playful animated aesthetic. \
         Do not anthropomorphize the food. The food should look like food.",
    );
    prompt
}

/// `recipe_<unix millis>_<9 base36 chars>.png`
fn image_filename() -> String {
    format!("{}.png", id::timestamped("recipe"))
}
