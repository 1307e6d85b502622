// Shared test support: a scripted TextGenerator
//
// Replies are consumed in call order, which matches the pipeline's
// strictly sequential parse -> code -> tests stages.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use codeforge_api::llm::{Completion, LlmError, TextGenerator};

pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<String, String>>>,
}

#[allow(dead_code)]
impl ScriptedGenerator {
    /// One scripted outcome per expected API call, in order
    pub fn new(script: Vec<Result<&str, &str>>) -> Self {
        Self {
            script: Mutex::new(
                script
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
        }
    }

    /// Happy path: every call succeeds with the next reply
    pub fn replies(replies: Vec<&str>) -> Self {
        Self::new(replies.into_iter().map(Ok).collect())
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<Completion, LlmError> {
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err("script exhausted".to_string()));

        match next {
            Ok(text) => Ok(Completion {
                output_tokens: text.len() as u64 / 4,
                input_tokens: 25,
                text,
            }),
            Err(message) => Err(LlmError::Api {
                status: 500,
                message,
            }),
        }
    }

    fn model(&self) -> &str {
        "scripted-model"
    }
}
