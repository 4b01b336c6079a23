mod azure_openai;
mod factory;
mod open_ai;
mod prompt;

pub use azure_openai::AzureOpenAIProvider;
pub(crate) use factory::implicit_openai_config;
pub use factory::ProviderFactory;
pub use open_ai::OpenAIProvider;
pub use prompt::{build_extraction_user_prompt, CHAT_SYSTEM_PROMPT, EXTRACTION_SYSTEM_PROMPT};

use crate::model::ConversationTurn;
use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

/// Error type for LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::RequestFailed(err.to_string())
    }
}

/// How the model must shape its answer
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    /// Free text
    Text,
    /// Strict structured output validated against a JSON schema
    JsonSchema { name: String, schema: Value },
}

/// A single completion call: system prompt, ordered turns, sampling settings
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub messages: Vec<ConversationTurn>,
    pub temperature: f32,
    pub response_format: ResponseFormat,
}

impl CompletionRequest {
    /// System prompt plus one user message, free-text mode
    pub fn new(system: impl Into<String>, user: impl Into<String>, temperature: f32) -> Self {
        Self {
            system: system.into(),
            messages: vec![ConversationTurn::user(user)],
            temperature,
            response_format: ResponseFormat::Text,
        }
    }

    /// Switch the request to strict schema-constrained mode
    pub fn with_schema(mut self, name: impl Into<String>, schema: Value) -> Self {
        self.response_format = ResponseFormat::JsonSchema {
            name: name.into(),
            schema,
        };
        self
    }

    /// Chat-completions request body shared by OpenAI-compatible endpoints
    pub(crate) fn to_chat_body(&self, model: Option<&str>, max_tokens: u32) -> Value {
        let mut messages = vec![json!({"role": "system", "content": self.system})];
        messages.extend(
            self.messages
                .iter()
                .map(|turn| json!({"role": turn.role.as_str(), "content": turn.content})),
        );

        let mut body = json!({
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": max_tokens,
        });

        if let Some(model) = model {
            body["model"] = json!(model);
        }

        if let ResponseFormat::JsonSchema { name, schema } = &self.response_format {
            body["response_format"] = json!({
                "type": "json_schema",
                "json_schema": {
                    "name": name,
                    "schema": schema,
                    "strict": true
                }
            });
        }

        body
    }
}

/// Unified trait for all LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openai", "azure_openai")
    fn provider_name(&self) -> &str;

    /// Run one completion and return the model's raw text (JSON text in schema mode)
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

/// Read a chat-completions response, turning HTTP failures into `ApiError`
pub(crate) async fn read_chat_response(response: reqwest::Response) -> Result<String, LlmError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(LlmError::ApiError {
            status: status.as_u16(),
            message,
        });
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| LlmError::ParseError(e.to_string()))?;
    log::debug!("{:?}", body);

    if let Some(tokens) = body["usage"]["total_tokens"].as_u64() {
        log::info!("Token usage: {} tokens", tokens);
    }

    let message = &body["choices"][0]["message"];
    if let Some(refusal) = message["refusal"].as_str() {
        return Err(LlmError::ParseError(format!("Model refused: {refusal}")));
    }

    message["content"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| LlmError::ParseError("Failed to extract content from response".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_body_has_no_response_format() {
        let request = CompletionRequest::new("system", "hello", 0.7);
        let body = request.to_chat_body(Some("gpt-4o"), 100);

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hello");
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn test_schema_body_is_strict() {
        let request = CompletionRequest::new("system", "recipe", 0.3)
            .with_schema("recipe_flowchart", json!({"type": "object"}));
        let body = request.to_chat_body(None, 100);

        assert!(body.get("model").is_none());
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
        assert_eq!(
            body["response_format"]["json_schema"]["name"],
            "recipe_flowchart"
        );
    }

    #[test]
    fn test_turn_roles_are_forwarded() {
        let mut request = CompletionRequest::new("system", "first", 0.7);
        request.messages.push(ConversationTurn::assistant("reply"));
        let body = request.to_chat_body(None, 10);

        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][2]["role"], "assistant");
    }
}
