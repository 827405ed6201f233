//! Lifecycle of a single task invocation.
use thiserror::Error;

use crate::context::IntegrationStatus;
use crate::runner::ProcessOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    NotRun,
    Running,
    Succeeded,
    Failed,
    Excepted,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid transition from {from:?} to {to:?}")]
    InvalidTransition { from: TaskState, to: TaskState },
    #[error("Cannot transition from terminal state {state:?}")]
    FromTerminalState { state: TaskState },
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Excepted)
    }

    pub fn transition(self, to: TaskState) -> Result<TaskState, TransitionError> {
        if self.is_terminal() {
            return Err(TransitionError::FromTerminalState { state: self });
        }
        let is_valid = matches!(
            (self, to),
            (Self::NotRun, Self::Running)
                | (Self::Running, Self::Succeeded)
                | (Self::Running, Self::Failed)
                | (Self::Running, Self::Excepted)
        );
        if is_valid {
            Ok(to)
        } else {
            Err(TransitionError::InvalidTransition { from: self, to })
        }
    }

    /// Terminal state for a completed process. A timeout is a build failure
    /// whatever the exit code or captured output says.
    pub fn from_outcome(outcome: &ProcessOutcome) -> TaskState {
        if outcome.succeeded() {
            Self::Succeeded
        } else {
            Self::Failed
        }
    }

    /// Status for a state produced by [`TaskState::from_outcome`]. Anything
    /// that did not finish successfully counts as a failure.
    pub fn outcome_status(self) -> IntegrationStatus {
        self.status().unwrap_or(IntegrationStatus::Failure)
    }

    /// Integration status reported for a terminal state; `None` otherwise.
    pub fn status(self) -> Option<IntegrationStatus> {
        match self {
            Self::Succeeded => Some(IntegrationStatus::Success),
            Self::Failed => Some(IntegrationStatus::Failure),
            Self::Excepted => Some(IntegrationStatus::Exception),
            Self::NotRun | Self::Running => None,
        }
    }
}
