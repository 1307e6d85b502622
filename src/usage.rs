// Per-model API usage accounting
//
// One tracker is constructed at startup and shared by every agent in the
// process. Counters are reset at the start of each pipeline run, so a
// snapshot reflects the latest run.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

/// Call and token counters for one model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelUsage {
    pub num_api_calls: u64,
    pub total_tokens: u64,
}

/// Usage snapshot keyed by model name
pub type UsageStats = BTreeMap<String, ModelUsage>;

#[derive(Debug, Default)]
pub struct UsageTracker {
    usage: Mutex<UsageStats>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, UsageStats> {
        self.usage.lock().expect("usage lock poisoned")
    }

    /// Ensure a model has an entry; zero counters if it is new
    pub fn initialize_model(&self, model: &str) {
        self.lock().entry(model.to_string()).or_default();
    }

    /// Record one API call and the tokens it consumed
    pub fn track_api_call(&self, model: &str, tokens: u64) {
        let mut usage = self.lock();
        let entry = usage.entry(model.to_string()).or_default();
        entry.num_api_calls += 1;
        entry.total_tokens += tokens;
        tracing::debug!(model, tokens, "tracked API call");
    }

    /// Deep-copied snapshot; mutating it cannot touch the tracker
    pub fn usage_stats(&self) -> UsageStats {
        self.lock().clone()
    }

    /// Clear all counters
    pub fn reset(&self) {
        self.lock().clear();
        tracing::debug!("usage tracking reset");
    }

    /// Serialize the current counters to a JSON file.
    ///
    /// Best-effort: a failure is logged and swallowed so a stats write
    /// can never fail a pipeline run.
    pub fn save_to_file(&self, path: &Path) {
        let stats = self.usage_stats();
        let result = serde_json::to_string_pretty(&stats)
            .map_err(std::io::Error::other)
            .and_then(|json| std::fs::write(path, json));

        match result {
            Ok(()) => tracing::info!(path = %path.display(), "model usage saved"),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to save model usage")
            }
        }
    }
}
