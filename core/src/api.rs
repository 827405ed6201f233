//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `ccbuild_core::api` instead of reaching into internal modules.

pub use crate::config::{
    load_default, load_from_path, AppConfig, ExecutorConfig, LoggingConfig, MsBuildTaskConfig,
};
pub use crate::context::{BuildCondition, IntegrationContext, IntegrationResult, IntegrationStatus};
pub use crate::error::{ConfigError, ExecError};
pub use crate::runner::{
    ProcessExecutor, ProcessInfo, ProcessOutcome, ProcessPriority, TIMED_OUT_EXIT_CODE,
};
pub use crate::task::{
    MsBuildTask, MsBuildTaskBuilder, TaskError, TaskResult, TaskState, DEFAULT_EXECUTABLE,
    DEFAULT_LOGGER, DEFAULT_OUTPUT_FILE, DEFAULT_TIMEOUT_SECS,
};
pub use crate::util::RingBytes;
