//! Routes free-form input to the scraper, the extractor or the assistant.

use crate::config::ClassifierConfig;
use reqwest::Url;

const RECIPE_KEYWORDS: &[&str] = &[
    "ingredients",
    "instructions",
    "directions",
    "recipe",
    "cook",
    "bake",
    "fry",
    "boil",
    "tablespoon",
    "teaspoon",
    "cup",
    "pound",
    "ounce",
    "gram",
    "kilogram",
    "liter",
    "preheat",
    "mix",
    "combine",
    "add",
    "stir",
    "whisk",
    "beat",
    "fold",
    "knead",
    "season",
    "salt",
    "pepper",
    "sugar",
    "flour",
    "butter",
    "oil",
    "eggs",
    "milk",
];

/// What a piece of user input most likely is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// Absolute http(s) URL
    Url(Url),
    /// Recipe text to extract from
    RecipeText,
    /// Anything else, answered by the assistant
    Chat,
}

/// Parse `input` as an absolute http or https URL
pub fn parse_http_url(input: &str) -> Option<Url> {
    Url::parse(input.trim())
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

pub fn classify(input: &str, config: &ClassifierConfig) -> InputKind {
    if let Some(url) = parse_http_url(input) {
        return InputKind::Url(url);
    }

    if looks_like_recipe(input, config) {
        InputKind::RecipeText
    } else {
        InputKind::Chat
    }
}

fn looks_like_recipe(input: &str, config: &ClassifierConfig) -> bool {
    let text = input.to_lowercase();
    let length = input.trim().chars().count();

    let keyword_count = RECIPE_KEYWORDS
        .iter()
        .filter(|keyword| text.contains(*keyword))
        .count();

    let has_ingredients =
        text.contains("ingredients") || (text.contains("ingredient") && keyword_count >= 2);
    let has_instructions = text.contains("instructions")
        || text.contains("directions")
        || (text.contains("step") && keyword_count >= 2);

    (has_ingredients && has_instructions && length > config.recipe_min_length)
        || (keyword_count >= config.keyword_min_count && length > config.keyword_min_length)
}
