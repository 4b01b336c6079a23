use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One ingredient node of the cooking flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Opaque token, unique within a recipe
    pub id: String,
    pub name: String,
    /// Free-form amount, may include a unit ("2 cups", "500g")
    pub quantity: String,
    pub description: String,
}

/// A cooking step transforming input ingredients into outputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Minutes
    pub duration: f64,
    pub input_ingredients: Vec<String>,
    pub output_ingredients: Vec<String>,
}

/// Structured output of extraction, handed off to the recipe store
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResult {
    pub recipe_name: String,
    pub ingredients: Vec<Ingredient>,
    pub actions: Vec<Action>,
    pub mermaid_diagram: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped_title: Option<String>,
}

impl RecipeResult {
    /// Name shown to users: recipe name, then scraped title, then `default`
    pub fn display_name<'a>(&'a self, default: &'a str) -> &'a str {
        if !self.recipe_name.trim().is_empty() {
            &self.recipe_name
        } else {
            self.scraped_title
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or(default)
        }
    }

    /// File name used when the diagram source is downloaded
    pub fn mermaid_filename(&self) -> String {
        let name = if self.recipe_name.is_empty() {
            "recipe"
        } else {
            &self.recipe_name
        };
        format!("{name}_flowchart.mmd")
    }

    /// Action inputs that resolve neither to an ingredient nor to another
    /// action's output, as `(action id, referenced id)` pairs.
    ///
    /// Output ids introduce intermediate products and are never dangling.
    pub fn dangling_references(&self) -> Vec<(String, String)> {
        let ingredient_ids: HashSet<&str> =
            self.ingredients.iter().map(|i| i.id.as_str()).collect();

        let mut dangling = Vec::new();
        for action in &self.actions {
            for id in &action.input_ingredients {
                let produced_elsewhere = self
                    .actions
                    .iter()
                    .filter(|other| other.id != action.id)
                    .any(|other| other.output_ingredients.contains(id));

                if !ingredient_ids.contains(id.as_str()) && !produced_elsewhere {
                    dangling.push((action.id.clone(), id.clone()));
                }
            }
        }
        dangling
    }
}

/// Text scraped from a recipe page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapedRecipe {
    pub title: String,
    pub content: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One message of a caller-owned conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
