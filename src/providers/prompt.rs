/// System prompt for structured recipe extraction.
///
/// Loaded from `prompt.txt` at compile time so the wording can be edited
/// without dealing with Rust string syntax.
pub const EXTRACTION_SYSTEM_PROMPT: &str = include_str!("prompt.txt");

/// Fixed persona for the cooking assistant chat.
pub const CHAT_SYSTEM_PROMPT: &str = "You are a helpful cooking assistant and culinary expert for Cardamom Recipe Vault. You can help with:
- Cooking techniques and tips
- Ingredient substitutions
- Recipe modifications
- Food safety questions
- Kitchen equipment advice
- Meal planning suggestions
- Nutritional information
- Cooking troubleshooting

Give helpful, accurate and practical advice in a friendly, conversational tone. If someone wants a recipe flowchart, suggest they share a recipe URL or paste the recipe text.

You can see the earlier conversation. When the user refers to a recipe discussed before, answer with that recipe's ingredients and steps in mind.";

/// User message embedding the recipe text for extraction
pub fn build_extraction_user_prompt(recipe_text: &str) -> String {
    format!(
        "Please analyze this recipe and create a structured flowchart:

{recipe_text}

Return the response in the exact JSON schema format with:
1. recipeName: a descriptive, human-readable name that captures the dish (e.g. \"Classic Chocolate Chip Cookies\", \"Spicy Thai Basil Chicken\")
2. ingredients: every ingredient with a unique id, name, quantity and description
3. actions: every action with an id, name, description, duration in minutes, and the ids of its input and output ingredients
4. mermaidDiagram: the complete Mermaid flowchart following the node and styling rules

Focus on the logical flow and timing of the cooking process, and keep the exact quantities given in the recipe."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_embedded() {
        assert!(!EXTRACTION_SYSTEM_PROMPT.is_empty());
        assert!(EXTRACTION_SYSTEM_PROMPT.contains("graph TD;"));
        assert!(EXTRACTION_SYSTEM_PROMPT.contains("classDef ingredient"));
        assert!(EXTRACTION_SYSTEM_PROMPT.contains("classDef action"));
        assert!(EXTRACTION_SYSTEM_PROMPT.contains("classDef final"));
        assert!(EXTRACTION_SYSTEM_PROMPT.contains("lowercase letters, digits and underscores"));
    }

    #[test]
    fn test_user_prompt_embeds_recipe() {
        let prompt = build_extraction_user_prompt("2 eggs\nBoil for 8 minutes");
        assert!(prompt.contains("2 eggs\nBoil for 8 minutes"));
        assert!(prompt.contains("recipeName"));
        assert!(prompt.contains("mermaidDiagram"));
    }

    #[test]
    fn test_user_prompt_is_deterministic() {
        assert_eq!(
            build_extraction_user_prompt("toast"),
            build_extraction_user_prompt("toast")
        );
    }

    #[test]
    fn test_chat_persona() {
        assert!(CHAT_SYSTEM_PROMPT.contains("cooking assistant"));
        assert!(CHAT_SYSTEM_PROMPT.contains("recipe URL"));
    }
}
