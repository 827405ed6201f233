use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::runner::ProcessPriority;

/// Top-level configuration document.
///
/// ```toml
/// [logging]
/// level = "debug"
///
/// [executor]
/// capture_bytes = 1048576
///
/// [msbuild]
/// projectFile = "CCNet.sln"
/// targets = "Build;Test"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub executor: ExecutorConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msbuild: Option<MsBuildTaskConfig>,
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str::<AppConfig>(s)?)
    }

    /// The `[msbuild]` section, required for anything that runs a task.
    pub fn msbuild(&self) -> Result<&MsBuildTaskConfig, ConfigError> {
        self.msbuild
            .as_ref()
            .ok_or(ConfigError::MissingSection("msbuild"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default = "default_logging_file")]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "ccbuild_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_file() -> bool {
    false
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: default_logging_file(),
            level: default_logging_level(),
            directory: None,
        }
    }
}

/// Knobs for the process executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Upper bound on retained bytes per output stream; older bytes are dropped.
    #[serde(default = "default_capture_bytes")]
    pub capture_bytes: usize,

    /// How long to wait for output pumps after the process is gone. Pipes held
    /// open by stray descendants are abandoned after this.
    #[serde(default = "default_io_drain_timeout_ms")]
    pub io_drain_timeout_ms: u64,
}

fn default_capture_bytes() -> usize {
    4 * 1024 * 1024
}

fn default_io_drain_timeout_ms() -> u64 {
    2_000
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            capture_bytes: default_capture_bytes(),
            io_drain_timeout_ms: default_io_drain_timeout_ms(),
        }
    }
}

/// Raw `[msbuild]` section exactly as written. Every field is optional;
/// defaults are applied when the section is bound into an `MsBuildTask`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MsBuildTaskConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_args: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<String>,

    /// Seconds. Zero or negative falls back to the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logger: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<ProcessPriority>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
}
