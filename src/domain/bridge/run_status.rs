//! Status of an upstream run as reported by the assistants API.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Lifecycle of a remote run.
///
/// The bridge only observes these states; the upstream service drives them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    /// A status this client does not know about; treated as still running.
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// True only for a successfully completed run.
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Completed)
    }

    /// True for terminal states other than `Completed`.
    pub fn is_failure(&self) -> bool {
        self.is_terminal() && !self.is_success()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StateMachine for RunStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use RunStatus::*;
        match self {
            Queued => vec![InProgress, Cancelling, Cancelled, Failed, Expired],
            InProgress => vec![
                RequiresAction,
                Cancelling,
                Completed,
                Failed,
                Incomplete,
                Expired,
            ],
            RequiresAction => vec![InProgress, Cancelling, Failed, Expired],
            Cancelling => vec![Cancelled, Failed, Completed],
            Unknown => vec![
                Queued,
                InProgress,
                RequiresAction,
                Cancelling,
                Cancelled,
                Failed,
                Completed,
                Incomplete,
                Expired,
            ],
            Cancelled | Failed | Completed | Incomplete | Expired => vec![],
        }
    }
}
