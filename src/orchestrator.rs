// Pipeline driver
//
// One `process_requirements` call is one run: a fresh mailbox, the three
// agents, parse → generate code → generate tests, artifact writing, and
// a usage-stats save that happens whether the run succeeded or not.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::agents::errors::AgentResult;
use crate::agents::{CoderAgent, CoordinatorAgent, TesterAgent};
use crate::artifacts::{strip_code_fences, ArtifactWriter};
use crate::llm::TextGenerator;
use crate::mailbox::Mailbox;
use crate::usage::UsageTracker;

const USAGE_FILE: &str = "model_usage.json";

/// Everything a successful run produced
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub run_id: Uuid,
    pub code: String,
    pub tests: String,
    pub code_file: PathBuf,
    pub test_file: PathBuf,
}

pub struct Orchestrator {
    generator: Arc<dyn TextGenerator>,
    usage: Arc<UsageTracker>,
    artifacts: ArtifactWriter,
    usage_path: PathBuf,
    reply_wait: Option<Duration>,
}

impl Orchestrator {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        usage: Arc<UsageTracker>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        let output_dir = output_dir.into();
        Self {
            generator,
            usage,
            usage_path: output_dir.join(USAGE_FILE),
            artifacts: ArtifactWriter::new(output_dir),
            reply_wait: None,
        }
    }

    /// Override the coordinator's reply wait (tests use a short one)
    pub fn with_reply_wait(mut self, wait: Duration) -> Self {
        self.reply_wait = Some(wait);
        self
    }

    /// Run the full pipeline for one set of requirements.
    ///
    /// Usage stats are saved exactly once per run, on the way out of both
    /// the success and the failure path.
    pub async fn process_requirements(&self, requirements: &str) -> AgentResult<GenerationReport> {
        let run_id = Uuid::new_v4();
        tracing::info!(%run_id, "orchestrator: starting run");

        self.usage.reset();
        let result = self.run_pipeline(run_id, requirements).await;

        // Best-effort, both paths
        self.usage.save_to_file(&self.usage_path);

        match &result {
            Ok(report) => tracing::info!(%run_id, code_file = %report.code_file.display(), "orchestrator: run complete"),
            Err(err) => tracing::error!(%run_id, error = %err, "orchestrator: run failed"),
        }
        result
    }

    async fn run_pipeline(&self, run_id: Uuid, requirements: &str) -> AgentResult<GenerationReport> {
        // Per-run mailbox: concurrent runs never share a queue
        let mailbox = Arc::new(Mailbox::new());

        let mut coordinator = CoordinatorAgent::new(
            mailbox.clone(),
            self.generator.clone(),
            self.usage.clone(),
        );
        if let Some(wait) = self.reply_wait {
            coordinator = coordinator.with_reply_wait(wait);
        }
        let coder = CoderAgent::new(mailbox.clone(), self.generator.clone(), self.usage.clone());
        let tester = TesterAgent::new(mailbox, self.generator.clone(), self.usage.clone());

        tracing::info!(%run_id, "orchestrator: step 1 - parsing requirements");
        let parsed = coordinator.parse_requirements(requirements).await?;

        tracing::info!(%run_id, "orchestrator: steps 2-3 - generating code and tests");
        let artifacts = coordinator
            .coordinate_generation(&coder, &tester, &parsed)
            .await?;

        let code = strip_code_fences(&artifacts.code);
        let tests = strip_code_fences(&artifacts.tests);

        let written = self.artifacts.write(&code, &tests)?;

        Ok(GenerationReport {
            run_id,
            code,
            tests,
            code_file: written.code_file,
            test_file: written.test_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::StubGenerator;
    use crate::agents::AgentError;
    use crate::llm::{Completion, LlmError};
    use async_trait::async_trait;

    struct FailingGenerator;

    #[async_trait]
    impl crate::llm::TextGenerator for FailingGenerator {
        async fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<Completion, LlmError> {
            Err(LlmError::Api {
                status: 529,
                message: "overloaded".to_string(),
            })
        }

        fn model(&self) -> &str {
            "failing-model"
        }
    }

    #[tokio::test]
    async fn run_produces_artifacts_and_usage_file() {
        let dir = tempfile::tempdir().unwrap();
        let usage = Arc::new(UsageTracker::new());
        let orchestrator = Orchestrator::new(
            Arc::new(StubGenerator::replying("```python\nprint('hi')\n```")),
            usage.clone(),
            dir.path(),
        )
        .with_reply_wait(Duration::from_millis(100));

        let report = orchestrator
            .process_requirements("print something")
            .await
            .unwrap();

        // fences stripped before writing
        assert_eq!(report.code, "print('hi')");
        assert!(report.code_file.exists());
        assert!(report.test_file.exists());

        // three API calls: parse, code, tests
        assert_eq!(usage.usage_stats()["stub-model"].num_api_calls, 3);
        assert!(dir.path().join("model_usage.json").exists());
    }

    #[tokio::test]
    async fn failed_parse_still_saves_usage() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = Orchestrator::new(
            Arc::new(FailingGenerator),
            Arc::new(UsageTracker::new()),
            dir.path(),
        );

        let err = orchestrator
            .process_requirements("anything")
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Generation(_)));

        // persist-on-exit runs on the failure path too
        assert!(dir.path().join("model_usage.json").exists());
    }
}
