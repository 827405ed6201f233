use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config document: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config document has no [{0}] section")]
    MissingSection(&'static str),
}

/// Errors raised by a `ProcessExecutor`.
///
/// A non-zero exit code or a timeout is not an error; both come back as a
/// `ProcessOutcome`. Only failures to start or observe the process land here.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("failed to launch '{executable}': {source}")]
    Launch {
        executable: String,
        source: std::io::Error,
    },
    #[error("process io error: {0}")]
    Io(String),
}
