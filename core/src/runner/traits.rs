use async_trait::async_trait;

use crate::error::ExecError;

use super::types::{ProcessInfo, ProcessOutcome};

/// Launches one external process per call and waits for it, bounded by
/// `ProcessInfo::timeout`.
///
/// Implementations must not retry, must kill the process tree when the
/// timeout fires, and must report spawn failures as `ExecError::Launch`
/// rather than as an exit code.
#[async_trait]
pub trait ProcessExecutor: Send + Sync {
    fn name(&self) -> &str;
    async fn execute(&self, info: &ProcessInfo) -> Result<ProcessOutcome, ExecError>;
}
