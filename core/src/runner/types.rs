use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::cmdline;

/// Exit code reported for a process that was killed because it ran past its
/// timeout.
pub const TIMED_OUT_EXIT_CODE: i32 = -1;

/// Scheduling hint for the launched process. On Unix it maps onto a nice
/// value; elsewhere it is carried but not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessPriority {
    Idle,
    BelowNormal,
    Normal,
    AboveNormal,
    High,
}

impl ProcessPriority {
    pub fn nice_value(self) -> i32 {
        match self {
            Self::Idle => 19,
            Self::BelowNormal => 10,
            Self::Normal => 0,
            Self::AboveNormal => -5,
            Self::High => -10,
        }
    }
}

impl fmt::Display for ProcessPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "Idle",
            Self::BelowNormal => "BelowNormal",
            Self::Normal => "Normal",
            Self::AboveNormal => "AboveNormal",
            Self::High => "High",
        };
        f.write_str(s)
    }
}

/// Fully resolved invocation handed to a `ProcessExecutor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub executable: String,
    /// Arguments in their rendered form. Tokens that needed quoting already
    /// carry their quotes.
    pub args: Vec<String>,
    pub working_directory: String,
    pub timeout: Duration,
    pub envs: BTreeMap<String, String>,
    pub priority: Option<ProcessPriority>,
}

impl ProcessInfo {
    /// Argument string as it would be typed on a command line.
    pub fn command_line(&self) -> String {
        self.args.join(" ")
    }

    /// Argument vector for platforms that take argv entries rather than a
    /// raw command line. Quoted tokens lose their quotes and free-form
    /// pass-through arguments are split on whitespace.
    pub fn argv(&self) -> Vec<String> {
        cmdline::split(&self.command_line())
    }
}

/// What a single process invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
    pub timed_out: bool,
}

impl ProcessOutcome {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }

    /// Standard output followed by standard error.
    pub fn output(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => {
                let mut out = self.stdout.clone();
                if !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(&self.stderr);
                out
            }
        }
    }
}
