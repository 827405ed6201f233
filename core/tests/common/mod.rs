use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use ccbuild_core::api::{
    BuildCondition, ExecError, IntegrationContext, IntegrationResult, IntegrationStatus,
    ProcessExecutor, ProcessInfo, ProcessOutcome, TIMED_OUT_EXIT_CODE,
};

pub const WORKING_DIRECTORY: &str = "/tmp/ccbuild/work";
pub const PROCESS_OUTPUT: &str = "Build succeeded.\n    0 Warning(s)\n    0 Error(s)\n";

pub enum Reply {
    Outcome(ProcessOutcome),
    LaunchFailure,
}

/// Executor double that records every invocation and answers with a canned
/// reply.
pub struct MockExecutor {
    reply: Reply,
    pub calls: Mutex<Vec<ProcessInfo>>,
}

impl MockExecutor {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::new(Reply::Outcome(outcome(0, PROCESS_OUTPUT, false)))
    }

    pub fn calls(&self) -> Vec<ProcessInfo> {
        self.calls.lock().unwrap().clone()
    }

    pub fn single_call(&self) -> ProcessInfo {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one process launch");
        calls.into_iter().next().unwrap()
    }
}

#[async_trait]
impl ProcessExecutor for MockExecutor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn execute(&self, info: &ProcessInfo) -> Result<ProcessOutcome, ExecError> {
        self.calls.lock().unwrap().push(info.clone());
        match &self.reply {
            Reply::Outcome(o) => Ok(o.clone()),
            Reply::LaunchFailure => Err(ExecError::Launch {
                executable: info.executable.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            }),
        }
    }
}

pub fn outcome(exit_code: i32, stdout: &str, timed_out: bool) -> ProcessOutcome {
    ProcessOutcome {
        exit_code,
        stdout: stdout.to_string(),
        stderr: String::new(),
        duration: Duration::from_millis(42),
        timed_out,
    }
}

pub fn timed_out_outcome() -> ProcessOutcome {
    outcome(TIMED_OUT_EXIT_CODE, "partial build output", true)
}

pub fn integration_result() -> IntegrationResult {
    IntegrationResult::new(IntegrationContext {
        project_name: "test".into(),
        label: "1.0".into(),
        working_directory: WORKING_DIRECTORY.into(),
        artifact_directory: r"c:\artifacts".into(),
        build_condition: BuildCondition::NoBuild,
        integration_status: IntegrationStatus::Success,
        last_integration_status: IntegrationStatus::Unknown,
    })
}
