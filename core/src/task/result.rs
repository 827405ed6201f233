use serde::{Deserialize, Serialize};

use crate::context::IntegrationStatus;
use crate::runner::ProcessOutcome;

/// Record a task appends to the integration result after it finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResult {
    pub task: String,
    pub status: IntegrationStatus,
    /// `None` when the process never started.
    pub exit_code: Option<i32>,
    pub timed_out: bool,
    pub duration_ms: u64,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// RFC 3339 start time.
    pub started_at: String,
}

impl TaskResult {
    pub fn from_outcome(
        task: &str,
        status: IntegrationStatus,
        outcome: &ProcessOutcome,
        started_at: String,
    ) -> Self {
        let error = if outcome.timed_out {
            Some(format!(
                "process timed out after {} ms",
                outcome.duration.as_millis()
            ))
        } else if outcome.exit_code != 0 {
            Some(format!("process exited with code {}", outcome.exit_code))
        } else {
            None
        };
        Self {
            task: task.to_string(),
            status,
            exit_code: Some(outcome.exit_code),
            timed_out: outcome.timed_out,
            duration_ms: outcome.duration.as_millis() as u64,
            output: outcome.output(),
            error,
            started_at,
        }
    }

    pub fn launch_failure(task: &str, message: String, started_at: String) -> Self {
        Self {
            task: task.to_string(),
            status: IntegrationStatus::Exception,
            exit_code: None,
            timed_out: false,
            duration_ms: 0,
            output: message.clone(),
            error: Some(message),
            started_at,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status == IntegrationStatus::Success
    }
}
