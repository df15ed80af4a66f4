use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened in one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Accepted,
    Rejected,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    pub instruction: String,
    pub outcome: RoundOutcome,
    pub applied: usize,
    pub unresolved: usize,
    pub ts: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub started: DateTime<Utc>,
    pub round_count: u32,
    pub accepted: u32,
    pub rejected: u32,
    pub failed: u32,
    pub unresolved_directives: u32,
    pub history: Vec<RoundRecord>,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            started: Utc::now(),
            round_count: 0,
            accepted: 0,
            rejected: 0,
            failed: 0,
            unresolved_directives: 0,
            history: Vec::new(),
        }
    }

    pub fn record(
        &mut self,
        instruction: &str,
        outcome: RoundOutcome,
        applied: usize,
        unresolved: usize,
    ) {
        self.round_count = self.round_count.saturating_add(1);
        match outcome {
            RoundOutcome::Accepted => self.accepted = self.accepted.saturating_add(1),
            RoundOutcome::Rejected => self.rejected = self.rejected.saturating_add(1),
            RoundOutcome::Failed => self.failed = self.failed.saturating_add(1),
        }
        self.unresolved_directives = self
            .unresolved_directives
            .saturating_add(u32::try_from(unresolved).unwrap_or(u32::MAX));
        self.history.push(RoundRecord {
            instruction: instruction.to_string(),
            outcome,
            applied,
            unresolved,
            ts: Utc::now(),
        });
    }

    /// One-line JSON summary for the log.
    pub fn summary(&self) -> String {
        serde_json::json!({
            "rounds": self.round_count,
            "accepted": self.accepted,
            "rejected": self.rejected,
            "failed": self.failed,
            "unresolved_directives": self.unresolved_directives,
        })
        .to_string()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
