//! Canned-reply backend for offline runs and tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use trading_core::error::LlmError;

use crate::{ChatBackend, ChatMessage};

/// Replays queued replies in order.
///
/// Once the queue is drained every call fails with
/// [`LlmError::EmptyResponse`].
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()));
        self
    }

    /// Queue a failure.
    pub fn with_error(self, error: LlmError) -> Self {
        self.push(Err(error));
        self
    }

    fn push(&self, reply: Result<String, LlmError>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    /// Conversations received so far.
    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(messages.to_vec());
        }
        self.replies
            .lock()
            .map_err(|_| LlmError::Connection("scripted backend poisoned".into()))?
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyResponse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order() {
        let backend = ScriptedBackend::new()
            .with_reply("LONG")
            .with_error(LlmError::PaymentRequired);
        let messages = [ChatMessage::user("hi")];

        assert_eq!(backend.complete(&messages).await.unwrap(), "LONG");
        assert!(matches!(
            backend.complete(&messages).await,
            Err(LlmError::PaymentRequired)
        ));
        assert!(matches!(
            backend.complete(&messages).await,
            Err(LlmError::EmptyResponse)
        ));
        assert_eq!(backend.calls().len(), 3);
    }
}
