// Per-agent capability over the shared mailbox
//
// A handle pins one identity: sends go out under it, receives drain its
// inbox. Construction registers the identity, so holding a handle is
// what it means for an agent to exist.

use std::sync::Arc;
use std::time::Duration;

use crate::agents::errors::AgentResult;

use super::{Mailbox, Message};

#[derive(Debug, Clone)]
pub struct AgentHandle {
    mailbox: Arc<Mailbox>,
    id: String,
}

impl AgentHandle {
    /// Register `id` with the mailbox and return its handle
    pub fn new(mailbox: Arc<Mailbox>, id: &str, role: &str, description: &str) -> Self {
        mailbox.register_agent(id, role, description);
        Self {
            mailbox,
            id: id.to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Send a message to another agent under this handle's identity
    pub fn send(&self, to: &str, content: serde_json::Value) -> AgentResult<Message> {
        self.mailbox.send_message(&self.id, to, content)
    }

    /// Drain all pending messages addressed to this agent
    pub fn receive(&self) -> Vec<Message> {
        self.mailbox.get_messages(&self.id)
    }

    /// All registered agent ids
    pub fn list_agents(&self) -> Vec<String> {
        self.mailbox.list_agent_ids()
    }

    /// Await a reply from a specific sender, bounded by `wait`
    pub async fn recv_from(&self, from: &str, wait: Duration) -> AgentResult<Message> {
        self.mailbox.wait_for_reply(&self.id, from, wait).await
    }
}
