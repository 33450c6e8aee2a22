use std::process::Stdio;

use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tempfile::{Builder, NamedTempFile};
use tokio::process::Command;
use tokio::time::{self, Duration};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    error::Error,
    types::{ExecutionResult, RunnerConfig},
    Result,
};

/// Runs one submission at a time through the full pipeline: stage the code
/// as a temp file, invoke the interpreter against it under a wall-clock
/// deadline, classify the outcome, and remove the staged file on every exit
/// path.
pub struct CodeRunner {
    config: RunnerConfig,
}

impl CodeRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Execute a submission. Total: every fault is rendered into the
    /// returned [`ExecutionResult`], never raised to the caller.
    pub async fn execute(&self, code: &str) -> ExecutionResult {
        let exec_id = Uuid::new_v4();
        debug!(%exec_id, bytes = code.len(), "staging submission");

        match self.run_isolated(code).await {
            Ok(result) => result,
            Err(Error::Timeout(secs)) => {
                warn!(%exec_id, secs, "execution deadline exceeded");
                ExecutionResult::failed(format!(
                    "Code execution timed out (max {} seconds)",
                    secs
                ))
            }
            Err(e) => {
                warn!(%exec_id, error = %e, "execution infrastructure fault");
                ExecutionResult::failed(format!("Execution error: {}", e))
            }
        }
    }

    async fn run_isolated(&self, code: &str) -> Result<ExecutionResult> {
        let interpreter = which::which(&self.config.interpreter)
            .map_err(|_| Error::InterpreterMissing(self.config.interpreter.display().to_string()))?;

        // The NamedTempFile handle owns the staged file for the whole call;
        // dropping it on any exit path (including `?` and the timeout
        // branch) unlinks the file.
        let staged = self.stage()?;
        tokio::fs::write(staged.path(), code)
            .await
            .map_err(Error::Staging)?;

        let mut command = Command::new(&interpreter);
        command
            .arg(staged.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Put the child in its own process group so the deadline path can
        // terminate descendants it spawned, not just the interpreter.
        #[cfg(unix)]
        command.process_group(0);

        let child = command.spawn().map_err(Error::Spawn)?;
        let pid = child.id();

        // wait_with_output drains stdout and stderr concurrently while
        // waiting, so a chatty child cannot deadlock against a full pipe.
        let output = match time::timeout(self.config.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(Error::Process(e)),
            Err(_) => {
                if let Some(pid) = pid {
                    kill_process_group(pid).await;
                }
                return Err(Error::Timeout(self.config.timeout.as_secs()));
            }
        };

        let stdout = capture(output.stdout, self.config.max_output_bytes);
        let stderr = capture(output.stderr, self.config.max_output_bytes);

        if output.status.success() {
            Ok(ExecutionResult::succeeded(&stdout))
        } else {
            // A nonzero exit with a silent stderr reports an empty error.
            Ok(ExecutionResult::failed(stderr.trim()))
        }
    }

    /// Create a uniquely-named staged file. Names are randomized by
    /// `tempfile`, so concurrent calls cannot collide.
    fn stage(&self) -> Result<NamedTempFile> {
        let mut builder = Builder::new();
        builder.prefix("pyrun-").suffix(".py");
        match &self.config.staging_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(Error::Staging)
    }
}

/// Terminate the child's entire process group: SIGTERM, a short grace
/// period, then SIGKILL. With `process_group(0)` the child's pid equals its
/// pgid.
#[cfg(unix)]
async fn kill_process_group(pid: u32) {
    let pgid = Pid::from_raw(pid as i32);
    let _ = killpg(pgid, Signal::SIGTERM);
    time::sleep(Duration::from_millis(10)).await;
    let _ = killpg(pgid, Signal::SIGKILL);
}

fn capture(mut bytes: Vec<u8>, cap: usize) -> String {
    if bytes.len() > cap {
        bytes.truncate(cap);
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
