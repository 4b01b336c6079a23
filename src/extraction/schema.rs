use serde_json::{json, Value};

/// Name the schema is registered under in strict structured-output mode
pub const SCHEMA_NAME: &str = "recipe_flowchart";

/// JSON schema the model's answer must satisfy.
///
/// Strict mode requires every property to be listed as required, so the
/// optional recipe name is expressed as a nullable string.
pub fn recipe_flowchart_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "recipeName": {
                "type": ["string", "null"],
                "description": "Descriptive, human-readable name of the dish"
            },
            "ingredients": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "name": { "type": "string" },
                        "quantity": {
                            "type": "string",
                            "description": "The amount of the ingredient (e.g., '1 cup', '2 tablespoons', '500g')"
                        },
                        "description": { "type": "string" }
                    },
                    "required": ["id", "name", "quantity", "description"],
                    "additionalProperties": false
                }
            },
            "actions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "name": { "type": "string" },
                        "description": { "type": "string" },
                        "duration": { "type": "number", "description": "Duration in minutes" },
                        "inputIngredients": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "Ids of the ingredients consumed by this action"
                        },
                        "outputIngredients": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "Ids of the ingredients produced by this action"
                        }
                    },
                    "required": [
                        "id",
                        "name",
                        "description",
                        "duration",
                        "inputIngredients",
                        "outputIngredients"
                    ],
                    "additionalProperties": false
                }
            },
            "mermaidDiagram": {
                "type": "string",
                "description": "Complete Mermaid flowchart starting with 'graph TD;', using lowercase node ids, classDef statements at the end and class statements applying them."
            }
        },
        "required": ["recipeName", "ingredients", "actions", "mermaidDiagram"],
        "additionalProperties": false
    })
}
