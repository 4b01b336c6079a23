//! Turn recipes into structured ingredient/action flowcharts.
//!
//! A submission (pasted text, uploaded file or recipe URL) is normalized to
//! recipe text, sent to an LLM in strict structured-output mode and returned
//! as a [`RecipeResult`] carrying a Mermaid flowchart. Input that does not
//! look like a recipe is answered by a cooking assistant instead.

pub mod blob_store;
pub mod builder;
pub mod chat;
pub mod classify;
pub mod config;
pub mod diagram;
pub mod error;
pub mod extraction;
mod id;
pub mod illustration;
pub mod model;
pub mod pipelines;
pub mod providers;
pub mod store;
pub mod url_to_text;

pub use builder::{InputSource, Outcome, RecipeFlow, RecipeFlowBuilder};
pub use config::AppConfig;
pub use diagram::{validate, DiagramIssue, DiagramReport};
pub use error::FlowError;
pub use model::{Action, ConversationTurn, Ingredient, RecipeResult, Role, ScrapedRecipe};
pub use store::{KeyValueStore, MemoryStore, RecipeStore};

/// Flowchart for pasted recipe text
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let recipe = cardamom::flowchart_from_text("Pancakes\n\n2 eggs\n1 cup flour\n\nWhisk, then fry.").await?;
/// println!("{}", recipe.mermaid_diagram);
/// # Ok(())
/// # }
/// ```
pub async fn flowchart_from_text(text: &str) -> Result<RecipeResult, FlowError> {
    expect_recipe(RecipeFlow::builder().text(text).build().await?)
}

/// Flowchart for a recipe page
pub async fn flowchart_from_url(url: &str) -> Result<RecipeResult, FlowError> {
    expect_recipe(RecipeFlow::builder().url(url).build().await?)
}

/// Ask the cooking assistant
pub async fn chat(message: &str, history: Vec<ConversationTurn>) -> Result<String, FlowError> {
    match RecipeFlow::builder()
        .chat(message)
        .history(history)
        .build()
        .await?
    {
        Outcome::Chat(reply) => Ok(reply),
        Outcome::Recipe(_) => Err(FlowError::ChatFailed(
            "expected a chat reply".to_string(),
        )),
    }
}

fn expect_recipe(outcome: Outcome) -> Result<RecipeResult, FlowError> {
    match outcome {
        Outcome::Recipe(recipe) => Ok(recipe),
        Outcome::Chat(_) => Err(FlowError::ExtractionFailed(
            "expected a recipe flowchart".to_string(),
        )),
    }
}
