//! Integration metadata supplied by the orchestration engine, and the result
//! object a task writes its outcome into.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::task::TaskResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntegrationStatus {
    Success,
    Failure,
    Exception,
    #[default]
    Unknown,
}

impl IntegrationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failure => "Failure",
            Self::Exception => "Exception",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for IntegrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the orchestration engine decided to run this integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BuildCondition {
    #[default]
    NoBuild,
    IfModificationExists,
    ForceBuild,
}

impl BuildCondition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoBuild => "NoBuild",
            Self::IfModificationExists => "IfModificationExists",
            Self::ForceBuild => "ForceBuild",
        }
    }
}

impl fmt::Display for BuildCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationContext {
    pub project_name: String,
    pub label: String,
    pub working_directory: String,
    pub artifact_directory: String,
    pub build_condition: BuildCondition,
    /// Status of the current integration at the moment the task starts.
    pub integration_status: IntegrationStatus,
    pub last_integration_status: IntegrationStatus,
}

impl Default for IntegrationContext {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            label: String::new(),
            working_directory: String::new(),
            artifact_directory: String::new(),
            build_condition: BuildCondition::NoBuild,
            integration_status: IntegrationStatus::Success,
            last_integration_status: IntegrationStatus::Unknown,
        }
    }
}

/// Shared result of one integration. A task appends its own record and
/// overwrites `task_output`; records written by other tasks are left alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationResult {
    pub context: IntegrationContext,
    pub status: IntegrationStatus,
    pub task_output: String,
    pub task_results: Vec<TaskResult>,
}

impl IntegrationResult {
    pub fn new(context: IntegrationContext) -> Self {
        let status = context.integration_status;
        Self {
            context,
            status,
            task_output: String::new(),
            task_results: Vec::new(),
        }
    }

    /// Context as seen by a task about to run, with the live status folded in.
    pub fn current_context(&self) -> IntegrationContext {
        IntegrationContext {
            integration_status: self.status,
            ..self.context.clone()
        }
    }

    /// Whether an earlier task already failed this integration.
    pub fn failed(&self) -> bool {
        matches!(
            self.status,
            IntegrationStatus::Failure | IntegrationStatus::Exception
        )
    }

    /// Append a task record. A failed integration stays failed; the task
    /// output always reflects the latest task.
    pub(crate) fn record(&mut self, task_result: TaskResult) {
        if !self.failed() {
            self.status = task_result.status;
        }
        self.task_output = task_result.output.clone();
        self.task_results.push(task_result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_names_match_wire_form() {
        assert_eq!(IntegrationStatus::Success.to_string(), "Success");
        assert_eq!(IntegrationStatus::Unknown.to_string(), "Unknown");
        assert_eq!(BuildCondition::NoBuild.to_string(), "NoBuild");
        assert_eq!(BuildCondition::ForceBuild.to_string(), "ForceBuild");
    }

    #[test]
    fn new_result_inherits_context_status() {
        let ctx = IntegrationContext {
            integration_status: IntegrationStatus::Failure,
            ..IntegrationContext::default()
        };
        let result = IntegrationResult::new(ctx);
        assert_eq!(result.status, IntegrationStatus::Failure);
        assert!(result.task_results.is_empty());
        assert!(result.task_output.is_empty());
    }

    #[test]
    fn current_context_reflects_live_status() {
        let mut result = IntegrationResult::new(IntegrationContext::default());
        result.status = IntegrationStatus::Exception;
        assert_eq!(
            result.current_context().integration_status,
            IntegrationStatus::Exception
        );
        assert_eq!(
            result.context.integration_status,
            IntegrationStatus::Success
        );
    }
}
