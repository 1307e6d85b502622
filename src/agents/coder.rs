use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::llm::TextGenerator;
use crate::mailbox::{AgentHandle, Mailbox};
use crate::usage::UsageTracker;

use super::errors::{AgentError, AgentResult};
use super::types::ParsedRequirements;
use super::{prompts, Worker, CODER_ID};

const CODE_MAX_TOKENS: u32 = 4096;

/// Coder Agent: generates code from parsed requirements
///
/// Answers `generate_code` work items from its mailbox with a
/// `code_ready` reply to the requester.
pub struct CoderAgent {
    handle: AgentHandle,
    generator: Arc<dyn TextGenerator>,
    usage: Arc<UsageTracker>,
}

impl CoderAgent {
    /// Create the agent and register the "coder" identity
    pub fn new(
        mailbox: Arc<Mailbox>,
        generator: Arc<dyn TextGenerator>,
        usage: Arc<UsageTracker>,
    ) -> Self {
        Self {
            handle: AgentHandle::new(
                mailbox,
                CODER_ID,
                "code_generator",
                "Generates code from requirements",
            ),
            generator,
            usage,
        }
    }

    /// Generate code satisfying the parsed requirements
    pub async fn generate_code(&self, requirements: &ParsedRequirements) -> AgentResult<String> {
        tracing::info!("coder: generating code");

        let prompt = prompts::generate_code().render(&HashMap::from([(
            "parsed_requirements",
            requirements.parsed.as_str(),
        )]));

        let completion = self.generator.complete(&prompt, CODE_MAX_TOKENS).await?;
        self.usage
            .track_api_call(self.generator.model(), completion.total_tokens());

        tracing::info!("coder: code generated");
        Ok(completion.text)
    }
}

#[async_trait]
impl Worker for CoderAgent {
    fn id(&self) -> &str {
        self.handle.id()
    }

    /// Drain the inbox and answer each `generate_code` work item
    async fn process_pending(&self) -> AgentResult<()> {
        for request in self.handle.receive() {
            match request.content["type"].as_str() {
                Some("generate_code") => {
                    let requirements: ParsedRequirements =
                        serde_json::from_value(request.content["requirements"].clone()).map_err(
                            |err| AgentError::MalformedReply {
                                agent: request.from.clone(),
                                reason: format!("bad generate_code work item: {err}"),
                            },
                        )?;

                    let code = self.generate_code(&requirements).await?;
                    self.handle
                        .send(&request.from, json!({"type": "code_ready", "code": code}))?;
                }
                other => {
                    tracing::warn!(work_item = ?other, from = %request.from, "coder: skipping unknown work item");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::StubGenerator;

    fn setup() -> (Arc<Mailbox>, CoderAgent, Arc<UsageTracker>) {
        let mailbox = Arc::new(Mailbox::new());
        let usage = Arc::new(UsageTracker::new());
        let coder = CoderAgent::new(
            mailbox.clone(),
            Arc::new(StubGenerator::replying("def add(a, b): return a + b")),
            usage.clone(),
        );
        (mailbox, coder, usage)
    }

    #[tokio::test]
    async fn generate_code_tracks_usage() {
        let (_, coder, usage) = setup();
        let requirements = ParsedRequirements {
            raw: "adder".to_string(),
            parsed: "PURPOSE: add numbers".to_string(),
        };

        let code = coder.generate_code(&requirements).await.unwrap();
        assert!(code.contains("def add"));

        let stats = usage.usage_stats();
        assert_eq!(stats["stub-model"].num_api_calls, 1);
        assert!(stats["stub-model"].total_tokens > 0);
    }

    #[tokio::test]
    async fn process_pending_replies_to_requester() {
        let (mailbox, coder, _) = setup();
        mailbox.register_agent("coordinator", "coordinator", "");

        let requirements = ParsedRequirements {
            raw: "adder".to_string(),
            parsed: "PURPOSE: add numbers".to_string(),
        };
        mailbox
            .send_message(
                "coordinator",
                CODER_ID,
                json!({"type": "generate_code", "requirements": requirements}),
            )
            .unwrap();

        coder.process_pending().await.unwrap();

        let replies = mailbox.get_messages("coordinator");
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].from, CODER_ID);
        assert_eq!(replies[0].content["type"], "code_ready");
        assert!(replies[0].content["code"].as_str().unwrap().contains("def add"));
    }

    #[tokio::test]
    async fn process_pending_skips_unknown_work_items() {
        let (mailbox, coder, _) = setup();
        mailbox.register_agent("coordinator", "coordinator", "");
        mailbox
            .send_message("coordinator", CODER_ID, json!({"type": "dance"}))
            .unwrap();

        coder.process_pending().await.unwrap();
        assert!(mailbox.get_messages("coordinator").is_empty());
    }
}
