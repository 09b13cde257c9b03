//! Offline `LlmClient` that replays canned answers. Used by tests and by
//! dry runs that must not reach the network.

use std::cell::RefCell;
use std::collections::VecDeque;

use super::{LlmClient, LlmError};

#[derive(Debug, Default)]
pub struct ScriptedLlm {
    answers: RefCell<VecDeque<String>>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new(answers: Vec<&str>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().map(String::from).collect()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    /// User prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.answers.borrow().len()
    }
}

impl LlmClient for ScriptedLlm {
    fn chat(&self, _system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        self.prompts.borrow_mut().push(user_prompt.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| LlmError::EmptyResponse(self.provider_name().to_string()))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }

    fn provider_name(&self) -> &str {
        "Scripted"
    }
}
