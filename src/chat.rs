//! Conversational cooking assistant.
//!
//! The assistant holds no state: the caller owns the conversation and passes
//! it in with every message.

use crate::error::FlowError;
use crate::model::ConversationTurn;
use crate::providers::{CompletionRequest, LlmProvider, CHAT_SYSTEM_PROMPT};
use log::{debug, info};
use scraper::Html;
use std::sync::Arc;
use std::time::Instant;

pub struct CookingAssistant {
    provider: Arc<dyn LlmProvider>,
    temperature: f32,
    history_window: usize,
}

impl CookingAssistant {
    pub fn new(provider: Arc<dyn LlmProvider>, temperature: f32, history_window: usize) -> Self {
        Self {
            provider,
            temperature,
            history_window,
        }
    }

    /// Answer `message` in the context of the most recent `history` turns
    pub async fn chat(
        &self,
        message: &str,
        history: &[ConversationTurn],
    ) -> Result<String, FlowError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(FlowError::InvalidInput("Message is required".to_string()));
        }

        let mut messages = recent_turns(history, self.history_window);
        info!(
            "Chat with {} of {} history turns",
            messages.len(),
            history.len()
        );
        messages.push(ConversationTurn::user(message));

        let request = CompletionRequest {
            messages,
            ..CompletionRequest::new(CHAT_SYSTEM_PROMPT, "", self.temperature)
        };

        let started = Instant::now();
        let reply = self
            .provider
            .complete(&request)
            .await
            .map_err(|e| FlowError::ChatFailed(e.to_string()))?;
        debug!(
            "Chat reply of {} characters in {:?}",
            reply.len(),
            started.elapsed()
        );

        Ok(reply)
    }
}

/// Last `window` turns with markup removed; turns left empty are dropped
pub fn recent_turns(history: &[ConversationTurn], window: usize) -> Vec<ConversationTurn> {
    let start = history.len().saturating_sub(window);
    history[start..]
        .iter()
        .filter_map(|turn| {
            let content = strip_markup(&turn.content);
            (!content.is_empty()).then(|| ConversationTurn {
                role: turn.role,
                content,
            })
        })
        .collect()
}

fn strip_markup(content: &str) -> String {
    if !content.contains('<') {
        return content.trim().to_string();
    }
    Html::parse_fragment(content)
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_string()
}
