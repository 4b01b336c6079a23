use cardamom::{Outcome, RecipeFlow};
use log::{debug, error};
use std::env;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Recipe text, recipe URL, path to a recipe file, or a chat message
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        return Err("Usage: cardamom <recipe text | url | file | question>".into());
    }
    let input = args.join(" ");

    let builder = if Path::new(&input).is_file() {
        debug!("Reading recipe from {}", input);
        // Submitted as text so the user's file is left in place
        RecipeFlow::builder().text(tokio::fs::read_to_string(&input).await?)
    } else {
        RecipeFlow::builder().input(input)
    };

    match builder.build().await {
        Ok(Outcome::Recipe(recipe)) => {
            println!("{}", serde_json::to_string_pretty(&recipe)?);
        }
        Ok(Outcome::Chat(reply)) => println!("{}", reply),
        Err(e) => {
            if e.is_scrape_error() {
                error!("Could not read the recipe page: {}", e);
            } else {
                error!("{}", e);
            }
            return Err(e.into());
        }
    }

    Ok(())
}
