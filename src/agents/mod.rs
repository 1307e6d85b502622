// Agent system modules
//
// Three stateless agents over one generator capability: the coordinator
// drives the pipeline, the coder and tester answer work items handed to
// them through the mailbox.

pub mod coder;
pub mod coordinator;
pub mod errors;
pub mod prompts;
pub mod tester;
pub mod types;

use async_trait::async_trait;

// Re-export main types
pub use coder::CoderAgent;
pub use coordinator::CoordinatorAgent;
pub use errors::AgentError;
pub use tester::TesterAgent;
pub use types::{GeneratedArtifacts, ParsedRequirements};

/// Well-known agent identities
pub const COORDINATOR_ID: &str = "coordinator";
pub const CODER_ID: &str = "coder";
pub const TESTER_ID: &str = "tester";

/// A dispatchable agent: drains its mailbox and answers work items
#[async_trait]
pub trait Worker: Send + Sync {
    /// The mailbox identity work items are addressed to
    fn id(&self) -> &str;

    /// Process every pending work item, replying through the mailbox
    async fn process_pending(&self) -> errors::AgentResult<()>;
}
