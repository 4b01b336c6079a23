use cardamom::providers::OpenAIProvider;
use cardamom::{validate, AppConfig, ConversationTurn, FlowError, Outcome, RecipeFlow};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::sync::Arc;

const COOKIES: &str = "Classic Chocolate Chip Cookies

Ingredients:
- 2 cups flour
- 1 cup butter
- 1 cup chocolate chips

Instructions:
1. Preheat oven to 350F.
2. Cream the butter, mix in the flour and fold in the chips.
3. Bake for 12 minutes.
";

fn flowchart(recipe_name: Option<&str>) -> String {
    json!({
        "recipeName": recipe_name,
        "ingredients": [
            {"id": "flour", "name": "Flour", "quantity": "2 cups", "description": "all-purpose"},
            {"id": "butter", "name": "Butter", "quantity": "1 cup", "description": "softened"},
            {"id": "chips", "name": "Chocolate chips", "quantity": "1 cup", "description": ""}
        ],
        "actions": [
            {"id": "mix", "name": "Mix", "description": "Cream and combine", "duration": 5,
             "inputIngredients": ["flour", "butter", "chips"], "outputIngredients": ["dough"]},
            {"id": "bake", "name": "Bake", "description": "Bake at 350F", "duration": 12,
             "inputIngredients": ["dough"], "outputIngredients": ["cookies"]}
        ],
        "mermaidDiagram": "graph TD;\nflour[Flour - 2 cups];\nbutter[Butter - 1 cup];\nchips[Chocolate chips - 1 cup];\nmix(Mix - 5 min);\nbake(Bake - 12 min);\ncookies[Cookies];\nflour --> mix\nbutter --> mix\nchips --> mix\nmix --> bake\nbake --> cookies\nclassDef ingredient fill:#e1f5fe\nclassDef action fill:#fff3e0\nclassDef final fill:#e8f5e8\nclass flour,butter,chips ingredient\nclass mix,bake action\nclass cookies final"
    })
    .to_string()
}

fn completion(content: &str) -> String {
    json!({"choices": [{"message": {"content": content}}]}).to_string()
}

fn provider(server: &ServerGuard) -> Arc<OpenAIProvider> {
    Arc::new(OpenAIProvider::with_base_url(
        "test-key".to_string(),
        server.url(),
        "gpt-4o".to_string(),
    ))
}

fn config() -> AppConfig {
    let mut config = AppConfig::default();
    config.scraper.blocked_retry_delay_ms = 0;
    config
}

#[tokio::test]
async fn test_recipe_text_to_flowchart() {
    let mut llm = Server::new_async().await;
    let mock = llm
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "response_format": {"type": "json_schema", "json_schema": {"strict": true}}
        })))
        .with_status(200)
        .with_body(completion(&flowchart(None)))
        .create_async()
        .await;

    let outcome = RecipeFlow::builder()
        .config(config())
        .provider(provider(&llm))
        .without_illustration()
        .input(COOKIES)
        .build()
        .await
        .unwrap();

    let recipe = match outcome {
        Outcome::Recipe(recipe) => recipe,
        Outcome::Chat(reply) => panic!("expected a recipe, got chat reply {reply}"),
    };
    assert_eq!(recipe.recipe_name, "Classic_Chocolate_Chip_Cookies");
    assert!(!recipe.ingredients.is_empty());
    assert!(!recipe.actions.is_empty());
    assert!(recipe.dangling_references().is_empty());
    assert!(recipe.image_url.is_none());

    let report = validate(&recipe.mermaid_diagram);
    assert!(report.issues.iter().all(|issue| !issue.is_structural()));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_short_input_routed_to_chat() {
    let mut llm = Server::new_async().await;
    let mock = llm
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#""content":"What is a roux\?""#.to_string()),
            Matcher::Regex(r#""content":"A cooked paste of flour and fat\.""#.to_string()),
            Matcher::Regex(r#""content":"not a url, too short""#.to_string()),
        ]))
        .with_status(200)
        .with_body(completion("Happy to help! Paste a recipe to get a flowchart."))
        .create_async()
        .await;

    let outcome = RecipeFlow::builder()
        .config(config())
        .provider(provider(&llm))
        .input("not a url, too short")
        .history(vec![
            ConversationTurn::user("What is a roux?"),
            ConversationTurn::assistant("<p>A cooked paste of <b>flour</b> and fat.</p>"),
        ])
        .build()
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Chat("Happy to help! Paste a recipe to get a flowchart.".to_string())
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_url_to_flowchart_carries_page_metadata() {
    let mut site = Server::new_async().await;
    let _page = site
        .mock("GET", "/cookies")
        .with_status(200)
        .with_body(
            "<html><body><article><h1>Best Cookies</h1><ul><li>2 cups flour</li><li>1 cup butter</li></ul>\
             <ol><li>Mix the flour and butter.</li><li>Bake for twelve minutes.</li></ol></article></body></html>",
        )
        .create_async()
        .await;

    let mut llm = Server::new_async().await;
    let _completion = llm
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Regex("Best Cookies INGREDIENTS".to_string()))
        .with_status(200)
        .with_body(completion(&flowchart(Some("Best Cookies"))))
        .create_async()
        .await;

    let url = format!("{}/cookies", site.url());
    let outcome = RecipeFlow::builder()
        .config(config())
        .provider(provider(&llm))
        .without_illustration()
        .input(url.clone())
        .build()
        .await
        .unwrap();

    match outcome {
        Outcome::Recipe(recipe) => {
            assert_eq!(recipe.recipe_name, "Best Cookies");
            assert_eq!(recipe.scraped_title.as_deref(), Some("Best Cookies"));
            assert_eq!(recipe.original_url.as_deref(), Some(url.as_str()));
            let json = serde_json::to_value(&recipe).unwrap();
            assert_eq!(json["originalUrl"], url);
            assert!(json.get("imageUrl").is_none());
        }
        Outcome::Chat(_) => panic!("expected a recipe"),
    }
}

#[tokio::test]
async fn test_blocked_url_never_reaches_llm() {
    let mut site = Server::new_async().await;
    let _blocked = site
        .mock("GET", "/recipe")
        .with_status(403)
        .expect_at_least(1)
        .create_async()
        .await;

    let mut llm = Server::new_async().await;
    let completion = llm
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let result = RecipeFlow::builder()
        .config(config())
        .provider(provider(&llm))
        .without_illustration()
        .url(format!("{}/recipe", site.url()))
        .build()
        .await;

    assert!(matches!(result, Err(FlowError::ScrapeBlocked)));
    completion.assert_async().await;
}

#[tokio::test]
async fn test_llm_error_is_extraction_failed() {
    let mut llm = Server::new_async().await;
    let _mock = llm
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .with_body(r#"{"error": {"message": "upstream exploded"}}"#)
        .create_async()
        .await;

    let result = RecipeFlow::builder()
        .config(config())
        .provider(provider(&llm))
        .without_illustration()
        .text(COOKIES)
        .build()
        .await;

    match result {
        Err(FlowError::ExtractionFailed(message)) => assert!(message.contains("500")),
        other => panic!("expected ExtractionFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_uploaded_file_removed_even_when_extraction_fails() {
    let dir = tempfile::tempdir().unwrap();
    let upload = dir.path().join("upload-cookies.txt");
    std::fs::write(&upload, COOKIES).unwrap();

    let mut llm = Server::new_async().await;
    let _mock = llm
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(completion("this is not json"))
        .create_async()
        .await;

    let result = RecipeFlow::builder()
        .config(config())
        .provider(provider(&llm))
        .without_illustration()
        .file(&upload)
        .build()
        .await;

    assert!(matches!(result, Err(FlowError::ExtractionFailed(_))));
    assert!(!upload.exists());
}
