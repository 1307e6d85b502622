use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::llm::TextGenerator;
use crate::mailbox::{AgentHandle, Mailbox};
use crate::usage::UsageTracker;

use super::errors::{AgentError, AgentResult};
use super::types::ParsedRequirements;
use super::{prompts, Worker, TESTER_ID};

const TESTS_MAX_TOKENS: u32 = 4096;

/// Tester Agent: generates a unittest suite for generated code
///
/// Answers `generate_tests` work items from its mailbox with a
/// `tests_ready` reply to the requester.
pub struct TesterAgent {
    handle: AgentHandle,
    generator: Arc<dyn TextGenerator>,
    usage: Arc<UsageTracker>,
}

impl TesterAgent {
    /// Create the agent and register the "tester" identity
    pub fn new(
        mailbox: Arc<Mailbox>,
        generator: Arc<dyn TextGenerator>,
        usage: Arc<UsageTracker>,
    ) -> Self {
        Self {
            handle: AgentHandle::new(
                mailbox,
                TESTER_ID,
                "test_generator",
                "Generates test cases for code",
            ),
            generator,
            usage,
        }
    }

    /// Generate test cases covering the code and the original requirements
    pub async fn generate_tests(
        &self,
        code: &str,
        requirements: &ParsedRequirements,
    ) -> AgentResult<String> {
        tracing::info!("tester: generating test cases");

        let prompt = prompts::generate_tests().render(&HashMap::from([
            ("code", code),
            ("parsed_requirements", requirements.parsed.as_str()),
        ]));

        let completion = self.generator.complete(&prompt, TESTS_MAX_TOKENS).await?;
        self.usage
            .track_api_call(self.generator.model(), completion.total_tokens());

        tracing::info!("tester: tests generated");
        Ok(completion.text)
    }
}

#[async_trait]
impl Worker for TesterAgent {
    fn id(&self) -> &str {
        self.handle.id()
    }

    /// Drain the inbox and answer each `generate_tests` work item
    async fn process_pending(&self) -> AgentResult<()> {
        for request in self.handle.receive() {
            match request.content["type"].as_str() {
                Some("generate_tests") => {
                    let code = request.content["code"].as_str().ok_or_else(|| {
                        AgentError::MalformedReply {
                            agent: request.from.clone(),
                            reason: "generate_tests work item without code".to_string(),
                        }
                    })?;
                    let requirements: ParsedRequirements =
                        serde_json::from_value(request.content["requirements"].clone()).map_err(
                            |err| AgentError::MalformedReply {
                                agent: request.from.clone(),
                                reason: format!("bad generate_tests work item: {err}"),
                            },
                        )?;

                    let tests = self.generate_tests(code, &requirements).await?;
                    self.handle
                        .send(&request.from, json!({"type": "tests_ready", "tests": tests}))?;
                }
                other => {
                    tracing::warn!(work_item = ?other, from = %request.from, "tester: skipping unknown work item");
                }
            }
        }
        Ok(())
    }
}
