//! Tokio-backed execution of a single build-tool process with a hard timeout.
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use ccbuild_core::api::{
    ExecError, ExecutorConfig, ProcessExecutor, ProcessInfo, ProcessOutcome, RingBytes,
    TIMED_OUT_EXIT_CODE,
};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

use super::io_pump::{self, LineStream};

/// Conventional shell encoding for signal deaths: 128 + signal number.
#[cfg(unix)]
const EXIT_CODE_SIGNAL_BASE: i32 = 128;

pub struct TokioProcessExecutor {
    cfg: ExecutorConfig,
}

impl TokioProcessExecutor {
    pub fn new(cfg: ExecutorConfig) -> Self {
        Self { cfg }
    }
}

impl Default for TokioProcessExecutor {
    fn default() -> Self {
        Self::new(ExecutorConfig::default())
    }
}

#[async_trait]
impl ProcessExecutor for TokioProcessExecutor {
    fn name(&self) -> &str {
        "tokio"
    }

    async fn execute(&self, info: &ProcessInfo) -> Result<ProcessOutcome, ExecError> {
        let mut cmd = build_command(info);
        let started_at = Instant::now();
        let mut child = cmd.spawn().map_err(|source| ExecError::Launch {
            executable: info.executable.clone(),
            source,
        })?;
        let pid = child.id();
        tracing::debug!(pid = ?pid, executable = %info.executable, "spawned process");

        // Both pipes were requested above; a missing one is an io fault.
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ExecError::Io("stdout pipe was not available".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ExecError::Io("stderr pipe was not available".into()))?;

        let ring_out = RingBytes::new(self.cfg.capture_bytes);
        let ring_err = RingBytes::new(self.cfg.capture_bytes);
        let out_task = io_pump::pump(stdout, ring_out.clone(), LineStream::Stdout);
        let err_task = io_pump::pump(stderr, ring_err.clone(), LineStream::Stderr);

        let drain = Duration::from_millis(self.cfg.io_drain_timeout_ms);

        let (exit_code, timed_out) = tokio::select! {
            status = child.wait() => {
                let status = status.map_err(|e| ExecError::Io(format!("wait failed: {}", e)))?;
                (exit_code_of(status), false)
            }
            _ = tokio::time::sleep(info.timeout) => {
                tracing::warn!(
                    pid = ?pid,
                    timeout_ms = info.timeout.as_millis() as u64,
                    "process timed out, killing process tree"
                );
                kill_tree(&mut child, pid, drain).await;
                (TIMED_OUT_EXIT_CODE, true)
            }
        };

        // Descendants that inherited the pipes can keep them open after the
        // direct child is gone; stop waiting for output after `drain`.
        await_pump(out_task, drain, LineStream::Stdout).await;
        await_pump(err_task, drain, LineStream::Stderr).await;

        let dropped = ring_out.dropped_bytes() + ring_err.dropped_bytes();
        if dropped > 0 {
            tracing::debug!(dropped_bytes = dropped, "output exceeded capture limit");
        }

        Ok(ProcessOutcome {
            exit_code,
            stdout: ring_out.to_string_lossy(),
            stderr: ring_err.to_string_lossy(),
            duration: started_at.elapsed(),
            timed_out,
        })
    }
}

fn build_command(info: &ProcessInfo) -> Command {
    let mut cmd = Command::new(&info.executable);

    #[cfg(windows)]
    for token in &info.args {
        cmd.raw_arg(token);
    }
    #[cfg(not(windows))]
    cmd.args(info.argv());

    if !info.working_directory.is_empty() {
        cmd.current_dir(&info.working_directory);
    }
    cmd.envs(&info.envs)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    #[cfg(unix)]
    configure_unix(&mut cmd, info.priority.map(|p| p.nice_value()));

    cmd
}

/// Put the child in its own process group so the whole tree can be killed,
/// and apply the nice value if one was requested.
#[cfg(unix)]
fn configure_unix(cmd: &mut Command, nice: Option<i32>) {
    cmd.process_group(0);

    let Some(nice) = nice else {
        return;
    };
    // SAFETY: the closure runs between fork and exec and only makes an
    // async-signal-safe libc call.
    unsafe {
        cmd.pre_exec(move || {
            // Raising priority needs privileges; on failure the child keeps
            // the inherited value.
            let _ = libc::setpriority(libc::PRIO_PROCESS, 0, nice);
            Ok(())
        });
    }
}

/// Kill the child and its process group, then reap it. Safe to call when the
/// process has already exited.
async fn kill_tree(child: &mut Child, pid: Option<u32>, reap_timeout: Duration) {
    #[cfg(unix)]
    kill_process_group(pid);
    #[cfg(not(unix))]
    let _ = pid;

    if let Err(e) = child.start_kill() {
        tracing::debug!(error = %e, "start_kill failed, process likely already exited");
    }
    if tokio::time::timeout(reap_timeout, child.wait()).await.is_err() {
        tracing::warn!(pid = ?pid, "killed process was not reaped in time");
    }
}

#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    let Some(pid) = pid else {
        return;
    };
    // The child leads its own process group, so its pid is the group id.
    // SAFETY: killpg only sends a signal.
    let rc = unsafe { libc::killpg(pid as libc::pid_t, libc::SIGKILL) };
    if rc == -1 {
        let err = std::io::Error::last_os_error();
        if err.raw_os_error() != Some(libc::ESRCH) {
            tracing::warn!(pid, error = %err, "failed to kill process group");
        }
    }
}

async fn await_pump(
    mut handle: JoinHandle<Result<u64, ExecError>>,
    timeout: Duration,
    stream: LineStream,
) {
    match tokio::time::timeout(timeout, &mut handle).await {
        Ok(Ok(Ok(bytes))) => {
            tracing::trace!(?stream, bytes, "output stream closed");
        }
        Ok(Ok(Err(e))) => {
            tracing::warn!(?stream, error = %e, "output stream failed");
        }
        Ok(Err(join_err)) => {
            tracing::warn!(?stream, error = %join_err, "output pump panicked");
        }
        Err(_elapsed) => {
            tracing::debug!(?stream, "output stream still open after drain timeout");
            handle.abort();
        }
    }
}

fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return EXIT_CODE_SIGNAL_BASE + sig;
        }
    }
    -1
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sh(script: &str, timeout: Duration) -> ProcessInfo {
        ProcessInfo {
            executable: "sh".into(),
            args: vec!["-c".into(), format!("\"{}\"", script)],
            working_directory: String::new(),
            timeout,
            envs: BTreeMap::new(),
            priority: None,
        }
    }

    fn executor() -> TokioProcessExecutor {
        TokioProcessExecutor::new(ExecutorConfig {
            capture_bytes: 64 * 1024,
            io_drain_timeout_ms: 500,
        })
    }

    #[tokio::test]
    async fn captures_output_of_successful_process() {
        let outcome = executor()
            .execute(&sh("echo hello; echo oops 1>&2", Duration::from_secs(10)))
            .await
            .unwrap();

        assert_eq!(outcome.exit_code, 0);
        assert!(!outcome.timed_out);
        assert_eq!(outcome.stdout, "hello\n");
        assert_eq!(outcome.stderr, "oops\n");
        assert!(outcome.succeeded());
    }

    #[tokio::test]
    async fn reports_non_zero_exit_as_data() {
        let outcome = executor()
            .execute(&sh("echo failing; exit 3", Duration::from_secs(10)))
            .await
            .unwrap();

        assert_eq!(outcome.exit_code, 3);
        assert!(!outcome.timed_out);
        assert_eq!(outcome.stdout, "failing\n");
    }

    #[tokio::test]
    async fn kills_process_on_timeout() {
        let started = Instant::now();
        let outcome = executor()
            .execute(&sh("echo started; sleep 30", Duration::from_millis(300)))
            .await
            .unwrap();

        assert!(outcome.timed_out);
        assert_eq!(outcome.exit_code, TIMED_OUT_EXIT_CODE);
        assert_eq!(outcome.stdout, "started\n");
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn timeout_kills_descendants() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("grandchild.pid");
        let script = format!("sleep 30 & echo $! > {}; wait", pid_file.display());

        let outcome = executor()
            .execute(&sh(&script, Duration::from_millis(500)))
            .await
            .unwrap();
        assert!(outcome.timed_out);

        let pid: libc::pid_t = std::fs::read_to_string(&pid_file)
            .unwrap()
            .trim()
            .parse()
            .unwrap();

        let mut gone = false;
        for _ in 0..40 {
            // SAFETY: signal 0 only checks for existence.
            if unsafe { libc::kill(pid, 0) } == -1 {
                gone = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(gone, "grandchild process {pid} is still alive");
    }

    #[tokio::test]
    async fn missing_executable_is_a_launch_error() {
        let mut info = sh("true", Duration::from_secs(5));
        info.executable = "/nonexistent/ccbuild-msbuild".into();

        let err = executor().execute(&info).await.unwrap_err();
        match err {
            ExecError::Launch { executable, source } => {
                assert_eq!(executable, "/nonexistent/ccbuild-msbuild");
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected launch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn runs_in_working_directory_with_env() {
        let dir = tempfile::tempdir().unwrap();
        let mut info = sh("pwd; echo $CCBUILD_TEST_VAR", Duration::from_secs(10));
        info.working_directory = dir.path().to_string_lossy().into_owned();
        info.envs.insert("CCBUILD_TEST_VAR".into(), "from-config".into());

        let outcome = executor().execute(&info).await.unwrap();

        let expected_dir = dir.path().canonicalize().unwrap();
        let mut lines = outcome.stdout.lines();
        let pwd = std::path::PathBuf::from(lines.next().unwrap());
        assert_eq!(pwd.canonicalize().unwrap(), expected_dir);
        assert_eq!(lines.next(), Some("from-config"));
    }

    #[tokio::test]
    async fn caps_captured_output() {
        let exec = TokioProcessExecutor::new(ExecutorConfig {
            capture_bytes: 8,
            io_drain_timeout_ms: 500,
        });
        let outcome = exec
            .execute(&sh("printf 0123456789abcdef", Duration::from_secs(10)))
            .await
            .unwrap();
        assert_eq!(outcome.stdout, "89abcdef");
    }
}
