//! Mock text generators for unit tests.

use crate::agent::AgentError;
use crate::llm::{GenerationParams, TextGenerator};
use crate::message::ChatMessage;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

type Responder = Box<dyn Fn(&[ChatMessage]) -> Result<String, AgentError> + Send + Sync>;

/// Replies from a script (repeating the last entry) or a closure, and records every call.
pub(crate) struct ScriptedGenerator {
    replies: Mutex<VecDeque<String>>,
    responder: Option<Responder>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedGenerator {
    pub(crate) fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            responder: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn from_fn(
        f: impl Fn(&[ChatMessage]) -> Result<String, AgentError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            responder: Some(Box::new(f)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        let message = message.to_string();
        Self::from_fn(move |_| Err(AgentError::Generation(message.clone())))
    }

    pub(crate) fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        messages: &[ChatMessage],
        _params: &GenerationParams,
    ) -> Result<String, AgentError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        if let Some(responder) = &self.responder {
            return responder(messages);
        }
        let mut replies = self.replies.lock().unwrap();
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };
        reply.ok_or_else(|| AgentError::Generation("script exhausted".to_string()))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
