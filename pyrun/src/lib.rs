//! # Python Code Execution Service
//!
//! Runs arbitrary user-submitted Python snippets in an isolated subprocess,
//! with a hard wall-clock deadline and guaranteed cleanup of staged files.
//! Every outcome — success, runtime error, timeout, infrastructure failure —
//! is reported as a plain [`ExecutionResult`] value; nothing escapes as an
//! unhandled fault.
//!
//! Isolation is enforced entirely at the process boundary: the submitted
//! code itself is never inspected or sanitized, and nothing restricts its
//! filesystem or network access beyond the subprocess and the deadline.

mod error;
mod runner;
mod service;
mod types;

pub use error::Error;
pub use runner::CodeRunner;
pub use service::ExecutionService;
pub use types::{ExecutionRequest, ExecutionResult, RunnerConfig};

/// Result type for code execution operations
pub type Result<T> = std::result::Result<T, Error>;
