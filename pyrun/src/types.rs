use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// A single execution request. The code is untrusted, arbitrary-length text
/// with no schema; it lives only for the duration of one call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// Source code to execute
    pub code: String,
}

/// Outcome of one execution attempt. Exactly one of `output`/`error` carries
/// content depending on `success`; the other stays empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Captured standard output, trimmed; populated only on success
    pub output: String,
    /// Captured standard error or a synthesized diagnostic; populated only
    /// on failure
    pub error: String,
    /// True iff the interpreter exited with code 0
    pub success: bool,
}

impl ExecutionResult {
    pub fn succeeded(stdout: &str) -> Self {
        Self {
            output: stdout.trim().to_owned(),
            error: String::new(),
            success: true,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            output: String::new(),
            error: error.into(),
            success: false,
        }
    }
}

/// Configuration for a [`CodeRunner`](crate::CodeRunner).
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Interpreter binary, resolved through `PATH` at execution time
    pub interpreter: PathBuf,
    /// Wall-clock deadline measured from process spawn
    pub timeout: Duration,
    /// Cap on captured bytes per stream, applied after the pipes are drained
    pub max_output_bytes: usize,
    /// Directory for staged source files; the system temp dir when `None`
    pub staging_dir: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            interpreter: PathBuf::from("python3"),
            timeout: Duration::from_secs(10),
            max_output_bytes: 1024 * 1024, // 1MB
            staging_dir: None,
        }
    }
}
