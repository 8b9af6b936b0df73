//! Scripted backend for orchestration tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use super::LlmBackend;
use crate::types::{ErrorClassifier, Result};

/// One scripted call outcome
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Fail(String),
    /// Sleep before answering (for timeout tests)
    Slow(Duration, String),
}

pub struct MockBackend {
    name: String,
    available: bool,
    replies: Mutex<VecDeque<MockReply>>,
    /// Used once the script runs out
    fallback: MockReply,
    calls: AtomicU32,
    prompts: Mutex<Vec<String>>,
}

impl MockBackend {
    /// Always answers `text`
    pub fn succeeding(name: &str, text: &str) -> Self {
        Self::with_fallback(name, MockReply::Text(text.to_string()))
    }

    /// Always fails with `message`
    pub fn failing(name: &str, message: &str) -> Self {
        Self::with_fallback(name, MockReply::Fail(message.to_string()))
    }

    pub fn slow(name: &str, delay: Duration) -> Self {
        Self::with_fallback(name, MockReply::Slow(delay, "late".to_string()))
    }

    fn with_fallback(name: &str, fallback: MockReply) -> Self {
        Self {
            name: name.to_string(),
            available: true,
            replies: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicU32::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue replies consumed before the fallback
    pub fn scripted(mut self, replies: impl IntoIterator<Item = MockReply>) -> Self {
        self.replies = Mutex::new(replies.into_iter().collect());
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Fail(message) => Err(ErrorClassifier::classify(&message, &self.name).into()),
            MockReply::Slow(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
        }
    }
}
