//! Heuristic recipe text extraction from arbitrary HTML pages.

use crate::config::ScraperConfig;
use log::debug;
use scraper::{ElementRef, Html, Node, Selector};

/// Containers tried in order; the first match wins
const RECIPE_CONTAINERS: &[&str] = &[
    r#"[itemtype*="Recipe"]"#,
    r#"[itemtype*="recipe"]"#,
    ".recipe",
    ".recipe-content",
    ".recipe-instructions",
    ".recipe-ingredients",
    ".entry-content",
    ".post-content",
    ".content",
    "article",
    ".recipe-card",
    ".recipe-details",
];

const MAIN_CONTAINERS: &str = "main, .main, #main, .content, #content";
const NOISE: &str = "script, style, nav, header, footer, .ad, .advertisement, .ads";
const INGREDIENT_LINES: &str = r#"[itemprop="ingredients"], .ingredient, .recipe-ingredient, li"#;
const INSTRUCTION_LINES: &str =
    r#"[itemprop="recipeInstructions"], .instruction, .recipe-instruction, .step, ol li"#;

pub const DEFAULT_TITLE: &str = "Recipe from URL";

/// Title and whitespace-collapsed recipe text pulled out of a page
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    pub title: String,
    pub text: String,
}

pub fn extract_content(html: &str, config: &ScraperConfig) -> PageContent {
    let document = Html::parse_document(html);
    let noise = Selector::parse(NOISE).unwrap();

    let container = find_container(&document);
    let title = find_title(&document, &noise);
    debug!("Extracted title: \"{}\"", title);

    let ingredients = collect_lines(
        &document,
        INGREDIENT_LINES,
        &noise,
        config.max_ingredient_len,
    );
    let instructions = collect_lines(
        &document,
        INSTRUCTION_LINES,
        &noise,
        config.max_instruction_len,
    );
    debug!(
        "Found {} potential ingredients and {} potential instructions",
        ingredients.len(),
        instructions.len()
    );

    let mut text = assemble(&title, &ingredients, &instructions);
    if text.chars().count() < config.structured_min_length {
        debug!("Structured text too short, using container text");
        text = container
            .map(|el| visible_text(el, &noise))
            .unwrap_or_default();
    }

    PageContent {
        title,
        text: collapse_whitespace(&text),
    }
}

fn find_container(document: &Html) -> Option<ElementRef<'_>> {
    RECIPE_CONTAINERS
        .iter()
        .chain([MAIN_CONTAINERS, "body"].iter())
        .find_map(|css| {
            let selector = Selector::parse(css).unwrap();
            document.select(&selector).next()
        })
}

fn find_title(document: &Html, noise: &Selector) -> String {
    ["h1", "title"]
        .iter()
        .find_map(|css| {
            let selector = Selector::parse(css).unwrap();
            document
                .select(&selector)
                .next()
                .map(|el| visible_text(el, noise).trim().to_string())
                .filter(|text| !text.is_empty())
        })
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

fn collect_lines(document: &Html, css: &str, noise: &Selector, max_len: usize) -> Vec<String> {
    let selector = Selector::parse(css).unwrap();
    document
        .select(&selector)
        .filter(|el| !within_noise(*el, noise))
        .map(|el| visible_text(el, noise).trim().to_string())
        .filter(|text| !text.is_empty() && text.chars().count() < max_len)
        .collect()
}

fn assemble(title: &str, ingredients: &[String], instructions: &[String]) -> String {
    let mut text = format!("{title}\n\n");

    if !ingredients.is_empty() {
        text.push_str("INGREDIENTS\n");
        for ingredient in ingredients {
            text.push_str(&format!("▢ {ingredient}\n"));
        }
        text.push('\n');
    }

    if !instructions.is_empty() {
        text.push_str("INSTRUCTIONS\n\n");
        for (index, instruction) in instructions.iter().enumerate() {
            text.push_str(&format!("{}. {}\n\n", index + 1, instruction));
        }
    }

    text
}

/// Text of `element` without anything inside a noise element
fn visible_text(element: ElementRef, noise: &Selector) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        if let Node::Text(chunk) = node.value() {
            let hidden = node
                .ancestors()
                .take_while(|ancestor| ancestor.id() != element.id())
                .filter_map(ElementRef::wrap)
                .any(|ancestor| noise.matches(&ancestor));
            if !hidden {
                text.push_str(chunk);
            }
        }
    }
    text
}

fn within_noise(element: ElementRef, noise: &Selector) -> bool {
    noise.matches(&element)
        || element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| noise.matches(&ancestor))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
