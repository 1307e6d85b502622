// In-memory agent mailbox
//
// Holds the registered agent identities and one ordered queue of pending
// messages. Delivery is destructive and exactly-once: `get_messages`
// removes everything addressed to the recipient in a single step, in
// send order. One Mailbox is created per pipeline run, so concurrent
// runs never share a queue.

pub mod handle;

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;

use crate::agents::errors::{AgentError, AgentResult};

pub use handle::AgentHandle;

/// Metadata stored for a registered agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentInfo {
    pub role: String,
    pub description: String,
    pub registered_at: DateTime<Utc>,
}

/// A message owned by the mailbox until its recipient receives it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub from: String,
    pub to: String,
    pub content: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct MailboxState {
    agents: HashMap<String, AgentInfo>,
    queue: VecDeque<Message>,
    next_id: u64,
}

/// Agent registry plus the shared pending-message queue
#[derive(Debug, Default)]
pub struct Mailbox {
    state: Mutex<MailboxState>,
    // Woken on every send so reply waiters can re-scan their inbox
    delivered: Notify,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MailboxState> {
        self.state.lock().expect("mailbox lock poisoned")
    }

    /// Register an agent, or replace its metadata if already registered.
    /// Pending messages for the identity are left untouched.
    pub fn register_agent(&self, id: &str, role: &str, description: &str) {
        let info = AgentInfo {
            role: role.to_string(),
            description: description.to_string(),
            registered_at: Utc::now(),
        };
        self.lock().agents.insert(id.to_string(), info);
        tracing::debug!(agent = id, role, "agent registered");
    }

    /// Queue a message from one registered agent to another.
    ///
    /// Fails with `UnknownAgent` if either identity is not registered;
    /// the queue is unchanged in that case.
    pub fn send_message(
        &self,
        from: &str,
        to: &str,
        content: serde_json::Value,
    ) -> AgentResult<Message> {
        let mut state = self.lock();

        if !state.agents.contains_key(from) {
            return Err(AgentError::UnknownAgent(from.to_string()));
        }
        if !state.agents.contains_key(to) {
            return Err(AgentError::UnknownAgent(to.to_string()));
        }

        state.next_id += 1;
        let message = Message {
            id: state.next_id,
            from: from.to_string(),
            to: to.to_string(),
            content,
            timestamp: Utc::now(),
        };
        state.queue.push_back(message.clone());
        drop(state);

        tracing::debug!(from, to, id = message.id, "message queued");
        self.delivered.notify_waiters();

        Ok(message)
    }

    /// Take every pending message addressed to `to`, in send order.
    ///
    /// Removal is a single atomic step; a second call returns nothing
    /// until new messages arrive.
    pub fn get_messages(&self, to: &str) -> Vec<Message> {
        let mut state = self.lock();
        let (inbox, rest): (VecDeque<Message>, VecDeque<Message>) =
            state.queue.drain(..).partition(|msg| msg.to == to);
        state.queue = rest;
        inbox.into()
    }

    /// Registered agent ids, sorted for stable output
    pub fn list_agent_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.lock().agents.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Metadata for a registered agent, if any
    pub fn agent_info(&self, id: &str) -> Option<AgentInfo> {
        self.lock().agents.get(id).cloned()
    }

    /// Wait until a message from `from` addressed to `to` arrives, or the
    /// wait elapses.
    ///
    /// Each pass drains the recipient's inbox; messages from other
    /// senders are discarded, since within a run the recipient only ever
    /// has one request in flight. Fails with `NoResponse(from)` on
    /// deadline.
    pub async fn wait_for_reply(
        &self,
        to: &str,
        from: &str,
        wait: Duration,
    ) -> AgentResult<Message> {
        let deadline = tokio::time::Instant::now() + wait;
        let mut delivered = std::pin::pin!(self.delivered.notified());
        loop {
            // Register for wake-ups before scanning, so a send landing
            // between the scan and the await still wakes us.
            delivered.as_mut().enable();

            for message in self.get_messages(to) {
                if message.from == from {
                    return Ok(message);
                }
                tracing::warn!(
                    recipient = to,
                    sender = %message.from,
                    expected = from,
                    "discarding unexpected message while awaiting reply"
                );
            }

            if tokio::time::timeout_at(deadline, delivered.as_mut())
                .await
                .is_err()
            {
                return Err(AgentError::NoResponse(from.to_string()));
            }
            delivered.set(self.delivered.notified());
        }
    }
}
