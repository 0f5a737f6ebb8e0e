//! Chat-completion collaborator for the chart analyst.
//!
//! The analyst talks to a [`ChatBackend`]; [`OpenRouterClient`] is the HTTP
//! implementation. Prompt rendering and reply parsing live here so that the
//! free-text format never leaks past this crate.

mod config;
mod openrouter;
mod prompt;
mod reply;
mod scripted;

pub use config::LlmConfig;
pub use openrouter::OpenRouterClient;
pub use prompt::{build_messages, render_prompt, SYSTEM_PROMPT};
pub use reply::parse_reply;
pub use scripted::ScriptedBackend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use trading_core::error::LlmError;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of a chat-completion conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A service that completes a chat conversation with a single reply.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Get the backend name.
    fn name(&self) -> &str;

    /// Send the conversation and return the first reply's text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;
}
