//! Structured extraction of ingredients, actions and a flowchart from recipe text.

mod schema;

pub use schema::{recipe_flowchart_schema, SCHEMA_NAME};

use crate::diagram;
use crate::error::FlowError;
use crate::illustration::Illustrator;
use crate::model::{Action, Ingredient, RecipeResult};
use crate::providers::{
    build_extraction_user_prompt, CompletionRequest, LlmProvider, EXTRACTION_SYSTEM_PROMPT,
};
use log::{debug, info, warn};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

/// Name used when neither the model nor the input text yields one
pub const DEFAULT_RECIPE_NAME: &str = "recipe";

/// Shape of the model's structured answer
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractedFlowchart {
    #[serde(default)]
    recipe_name: Option<String>,
    ingredients: Vec<Ingredient>,
    actions: Vec<Action>,
    mermaid_diagram: String,
}

pub struct RecipeExtractor {
    provider: Arc<dyn LlmProvider>,
    illustrator: Option<Illustrator>,
    temperature: f32,
}

impl RecipeExtractor {
    pub fn new(provider: Arc<dyn LlmProvider>, temperature: f32) -> Self {
        Self {
            provider,
            illustrator: None,
            temperature,
        }
    }

    /// Attach an illustrator; its outcome never affects extraction success
    pub fn with_illustrator(mut self, illustrator: Illustrator) -> Self {
        self.illustrator = Some(illustrator);
        self
    }

    /// Turn recipe text into a [`RecipeResult`]
    pub async fn extract(&self, recipe_text: &str) -> Result<RecipeResult, FlowError> {
        if recipe_text.trim().is_empty() {
            return Err(FlowError::InvalidInput(
                "Recipe text cannot be empty".to_string(),
            ));
        }

        info!(
            "Extracting flowchart from {} characters of recipe text",
            recipe_text.len()
        );
        debug!("Recipe preview: {}", preview(recipe_text, 200));

        let request = CompletionRequest::new(
            EXTRACTION_SYSTEM_PROMPT,
            build_extraction_user_prompt(recipe_text),
            self.temperature,
        )
        .with_schema(SCHEMA_NAME, recipe_flowchart_schema());

        let started = Instant::now();
        let raw = self
            .provider
            .complete(&request)
            .await
            .map_err(|e| FlowError::ExtractionFailed(e.to_string()))?;
        info!(
            "{} responded in {:?}",
            self.provider.provider_name(),
            started.elapsed()
        );

        let mut result = parse_flowchart(&raw, recipe_text)?;
        log_summary(&result);

        let report = diagram::validate(&result.mermaid_diagram);
        if !report.valid {
            warn!(
                "Mermaid diagram for '{}' has {} issue(s)",
                result.recipe_name,
                report.issues.len()
            );
            report.log();
        }

        for (action, missing) in result.dangling_references() {
            warn!(
                "Action '{}' references unknown ingredient '{}'",
                action, missing
            );
        }

        if let Some(illustrator) = &self.illustrator {
            result.image_url = illustrator.illustrate(&result).await;
        }

        Ok(result)
    }
}

/// Deserialize and sanity-check the model payload
fn parse_flowchart(raw: &str, recipe_text: &str) -> Result<RecipeResult, FlowError> {
    let extracted: ExtractedFlowchart = serde_json::from_str(raw)
        .map_err(|e| FlowError::ExtractionFailed(format!("Malformed model response: {e}")))?;

    if let Some(action) = extracted
        .actions
        .iter()
        .find(|a| !a.duration.is_finite() || a.duration < 0.0)
    {
        return Err(FlowError::ExtractionFailed(format!(
            "Action '{}' has invalid duration {}",
            action.id, action.duration
        )));
    }

    let mut seen = HashSet::new();
    for ingredient in &extracted.ingredients {
        if !seen.insert(ingredient.id.as_str()) {
            warn!("Duplicate ingredient id '{}'", ingredient.id);
        }
    }

    let recipe_name = match extracted.recipe_name.map(|n| n.trim().to_string()) {
        Some(name) if !name.is_empty() => {
            info!("Model-provided recipe name: \"{}\"", name);
            name
        }
        _ => {
            let name = fallback_recipe_name(recipe_text);
            info!("Using fallback recipe name: \"{}\"", name);
            name
        }
    };

    Ok(RecipeResult {
        recipe_name,
        ingredients: extracted.ingredients,
        actions: extracted.actions,
        mermaid_diagram: extracted.mermaid_diagram,
        image_url: None,
        original_url: None,
        scraped_title: None,
    })
}

/// Deterministic name from the first non-empty line: ASCII alphanumerics
/// only, whitespace runs collapsed to `_`, [`DEFAULT_RECIPE_NAME`] if nothing is left
pub fn fallback_recipe_name(recipe_text: &str) -> String {
    let first_line = recipe_text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default();

    let cleaned: String = first_line
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    let name = cleaned.split_whitespace().collect::<Vec<_>>().join("_");

    if name.is_empty() {
        DEFAULT_RECIPE_NAME.to_string()
    } else {
        name
    }
}

fn log_summary(result: &RecipeResult) {
    info!(
        "Extracted '{}': {} ingredients, {} actions, {} character diagram",
        result.recipe_name,
        result.ingredients.len(),
        result.actions.len(),
        result.mermaid_diagram.len()
    );
    for (index, ingredient) in result.ingredients.iter().enumerate() {
        let quantity = if ingredient.quantity.is_empty() {
            "No quantity"
        } else {
            &ingredient.quantity
        };
        debug!("  {}. {} - {}", index + 1, ingredient.name, quantity);
    }
    for (index, action) in result.actions.iter().enumerate() {
        debug!("  {}. {} ({} min)", index + 1, action.name, action.duration);
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    let mut preview: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        preview.push_str("...");
    }
    preview
}
