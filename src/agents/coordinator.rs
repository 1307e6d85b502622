use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use crate::llm::TextGenerator;
use crate::mailbox::{AgentHandle, Mailbox, Message};
use crate::usage::UsageTracker;

use super::errors::{AgentError, AgentResult};
use super::types::{GeneratedArtifacts, ParsedRequirements};
use super::{prompts, Worker, COORDINATOR_ID};

const PARSE_MAX_TOKENS: u32 = 1024;

/// How long the coordinator waits for a worker's reply before giving up
const DEFAULT_REPLY_WAIT: Duration = Duration::from_secs(2);

/// Coordinator Agent: drives the three-stage generation workflow
///
/// Stage 1 parses requirements with a direct generator call. Stages 2 and
/// 3 hand work to the coder and tester through the mailbox: send the work
/// item, dispatch the worker, then await its reply with a bounded wait.
pub struct CoordinatorAgent {
    handle: AgentHandle,
    generator: Arc<dyn TextGenerator>,
    usage: Arc<UsageTracker>,
    reply_wait: Duration,
}

impl CoordinatorAgent {
    /// Create the agent and register the "coordinator" identity
    pub fn new(
        mailbox: Arc<Mailbox>,
        generator: Arc<dyn TextGenerator>,
        usage: Arc<UsageTracker>,
    ) -> Self {
        Self {
            handle: AgentHandle::new(
                mailbox,
                COORDINATOR_ID,
                "coordinator",
                "Manages workflow and coordinates other agents",
            ),
            generator,
            usage,
            reply_wait: DEFAULT_REPLY_WAIT,
        }
    }

    /// Override the reply wait (tests use a short one)
    pub fn with_reply_wait(mut self, wait: Duration) -> Self {
        self.reply_wait = wait;
        self
    }

    /// Stage 1: structure the user's free-text requirements
    pub async fn parse_requirements(&self, requirements: &str) -> AgentResult<ParsedRequirements> {
        tracing::info!("coordinator: parsing requirements");

        let prompt =
            prompts::parse_requirements().render(&HashMap::from([("requirements", requirements)]));

        let completion = self.generator.complete(&prompt, PARSE_MAX_TOKENS).await?;
        self.usage
            .track_api_call(self.generator.model(), completion.total_tokens());

        tracing::info!("coordinator: requirements parsed");
        Ok(ParsedRequirements {
            raw: requirements.to_string(),
            parsed: completion.text,
        })
    }

    /// Stages 2 and 3: coordinate code and test generation
    pub async fn coordinate_generation(
        &self,
        coder: &dyn Worker,
        tester: &dyn Worker,
        requirements: &ParsedRequirements,
    ) -> AgentResult<GeneratedArtifacts> {
        tracing::info!("coordinator: requesting code generation");
        let code_reply = self
            .request_work(
                coder,
                json!({"type": "generate_code", "requirements": requirements}),
            )
            .await?;
        let code = extract_field(&code_reply, coder.id(), "code")?;

        tracing::info!("coordinator: requesting test generation");
        let tests_reply = self
            .request_work(
                tester,
                json!({
                    "type": "generate_tests",
                    "code": code,
                    "requirements": requirements,
                }),
            )
            .await?;
        let tests = extract_field(&tests_reply, tester.id(), "tests")?;

        Ok(GeneratedArtifacts { code, tests })
    }

    /// Send a work item, dispatch the worker, then await its reply.
    ///
    /// The reply wait is bounded: a worker that never answers surfaces as
    /// `NoResponse` instead of hanging the run.
    async fn request_work(
        &self,
        worker: &dyn Worker,
        work_item: serde_json::Value,
    ) -> AgentResult<Message> {
        self.handle.send(worker.id(), work_item)?;
        worker.process_pending().await?;
        self.handle.recv_from(worker.id(), self.reply_wait).await
    }
}

fn extract_field(reply: &Message, agent: &str, field: &str) -> AgentResult<String> {
    reply.content[field]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AgentError::MalformedReply {
            agent: agent.to_string(),
            reason: format!("reply missing `{field}` field"),
        })
}
