//! Scripted mock client for tests and offline runs.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{GenerationParams, LlmClient, LlmError, Message};

/// Mock client that replays a queue of canned outcomes.
///
/// Each `complete` call pops the next scripted response; once the queue is
/// exhausted, further calls fail with a provider error. The call counter lets
/// tests assert that a path made (or did not make) a model call.
#[derive(Debug, Default)]
pub struct MockLlm {
    responses: Mutex<VecDeque<Result<String, String>>>,
    calls: AtomicUsize,
}

impl MockLlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a sequence of successful completions, in call order.
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|s| Ok(s.into())).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue one successful completion.
    pub fn push_response(&self, response: impl Into<String>) {
        self.responses
            .lock()
            .expect("mock response queue poisoned")
            .push_back(Ok(response.into()));
    }

    /// Queue one transport failure.
    pub fn push_error(&self, message: impl Into<String>) {
        self.responses
            .lock()
            .expect("mock response queue poisoned")
            .push_back(Err(message.into()));
    }

    /// Number of `complete` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn complete(
        &self,
        _messages: &[Message],
        _params: &GenerationParams,
    ) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .responses
            .lock()
            .expect("mock response queue poisoned")
            .pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(LlmError::Provider(message)),
            None => Err(LlmError::Provider(
                "mock response queue exhausted".to_string(),
            )),
        }
    }
}
