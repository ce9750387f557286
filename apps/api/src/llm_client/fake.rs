//! Scripted `CompletionService` for tests. Replies are keyed by prompt template,
//! recognised from the template's closing line.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::llm_client::{Completion, CompletionService, LlmError};
use crate::tailoring::prompts::PromptTemplate;

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail(String),
}

#[derive(Default)]
pub struct FakeCompletion {
    replies: Mutex<HashMap<PromptTemplate, VecDeque<Reply>>>,
    delays: Mutex<HashMap<PromptTemplate, Duration>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply for `template`. The last queued reply repeats forever.
    pub fn respond(self, template: PromptTemplate, text: &str) -> Self {
        self.push(template, Reply::Text(text.to_string()))
    }

    pub fn fail(self, template: PromptTemplate, message: &str) -> Self {
        self.push(template, Reply::Fail(message.to_string()))
    }

    /// Makes every call for `template` wait `delay` before replying.
    pub fn delay(self, template: PromptTemplate, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(template, delay);
        self
    }

    fn push(self, template: PromptTemplate, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(template)
            .or_default()
            .push_back(reply);
        self
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

fn template_for(prompt: &str) -> Option<PromptTemplate> {
    PromptTemplate::all().into_iter().find(|t| {
        t.skeleton()
            .lines()
            .last()
            .is_some_and(|closing| prompt.ends_with(closing))
    })
}

#[async_trait]
impl CompletionService for FakeCompletion {
    async fn complete(&self, prompt: &str) -> Result<Completion, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let template = template_for(prompt).ok_or(LlmError::EmptyContent)?;
        let delay = self.delays.lock().unwrap().get(&template).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let reply = {
            let mut replies = self.replies.lock().unwrap();
            let queue = replies.get_mut(&template).ok_or(LlmError::EmptyContent)?;
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        };

        match reply {
            Some(Reply::Text(text)) => Ok(Completion { text, usage: None }),
            Some(Reply::Fail(message)) => Err(LlmError::Api {
                status: 500,
                message,
            }),
            None => Err(LlmError::EmptyContent),
        }
    }
}
