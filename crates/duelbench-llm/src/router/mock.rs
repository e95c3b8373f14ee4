//! Mock backend for testing
//!
//! Returns queued outputs in order and records every call it receives.
//! With an empty queue it answers "mock response" once per requested sample.

use crate::error::Result;
use crate::message::Message;
use crate::providers::{ChatBackend, ChatShape, ProviderFamily, ProviderOutput};

use std::collections::VecDeque;
use std::sync::Mutex;

/// One call seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Conversation sent
    pub messages: Vec<Message>,
    /// Shape sent
    pub shape: ChatShape,
}

/// A scripted backend standing in for any provider family
pub struct MockBackend {
    family: ProviderFamily,
    responses: Mutex<VecDeque<Result<ProviderOutput>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockBackend {
    /// Create a mock serving `family`
    #[must_use]
    pub fn new(family: ProviderFamily) -> Self {
        Self {
            family,
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a full output
    pub fn push_output(&self, output: ProviderOutput) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Ok(output));
    }

    /// Queue a single text with no usage metadata
    pub fn push_text(&self, text: impl Into<String>) {
        self.push_output(ProviderOutput::text(text));
    }

    /// Queue a failure
    pub fn push_error(&self, error: crate::error::Error) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Err(error));
    }

    /// Number of calls received
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Every call received, in order
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait::async_trait]
impl ChatBackend for MockBackend {
    fn family(&self) -> ProviderFamily {
        self.family
    }

    async fn generate(&self, messages: &[Message], shape: &ChatShape) -> Result<ProviderOutput> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedCall {
                messages: messages.to_vec(),
                shape: shape.clone(),
            });

        let queued = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        match queued {
            Some(result) => result,
            None => {
                let n = shape.n.unwrap_or(1) as usize;
                Ok(ProviderOutput {
                    texts: vec!["mock response".to_string(); n],
                    metadata: None,
                })
            }
        }
    }
}
