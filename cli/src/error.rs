use ccbuild_core::api::{ConfigError, TaskError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("task failed: {0}")]
    Task(#[from] TaskError),
    #[error("logging setup failed: {0}")]
    Logging(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl CliError {
    // 0: success
    // 1: build failure (returned as a normal exit code, not as an error)
    // 11: config error
    // 20: process launch / IO error
    // 50: internal/uncategorized
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 11,
            Self::Task(TaskError::Launch(_)) => 20,
            Self::Logging(_) => 11,
            Self::Io(_) => 20,
            Self::Anyhow(_) => 50,
        }
    }
}
