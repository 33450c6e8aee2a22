use thiserror::Error;

/// Faults that can occur while running a submission. None of these cross the
/// [`CodeRunner::execute`](crate::CodeRunner::execute) boundary — they are
/// rendered into the `error` field of an
/// [`ExecutionResult`](crate::ExecutionResult) there.
#[derive(Error, Debug)]
pub enum Error {
    #[error("interpreter not found: {0}")]
    InterpreterMissing(String),

    #[error("failed to stage code: {0}")]
    Staging(#[source] std::io::Error),

    #[error("failed to spawn process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("process error: {0}")]
    Process(#[source] std::io::Error),

    #[error("timeout after {0} seconds")]
    Timeout(u64),

    #[error("system error: {0}")]
    System(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
