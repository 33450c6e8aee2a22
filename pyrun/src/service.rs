use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::{
    runner::CodeRunner,
    types::{ExecutionRequest, ExecutionResult, RunnerConfig},
};

/// Concurrency-bounded facade over [`CodeRunner`]. Each execution occupies
/// one OS process for its duration, so the semaphore is what keeps a burst
/// of requests from unbounded process fan-out.
#[derive(Clone)]
pub struct ExecutionService {
    runner: Arc<CodeRunner>,
    semaphore: Arc<Semaphore>,
}

impl ExecutionService {
    pub fn new(max_concurrent_executions: usize, config: RunnerConfig) -> Self {
        Self {
            runner: Arc::new(CodeRunner::new(config)),
            semaphore: Arc::new(Semaphore::new(max_concurrent_executions)),
        }
    }

    /// Execute one submission. Total like [`CodeRunner::execute`]: the
    /// caller always gets a well-formed result, never a fault.
    pub async fn execute(&self, request: ExecutionRequest) -> ExecutionResult {
        let _permit = match self.semaphore.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                return ExecutionResult::failed(format!("Execution error: {}", e));
            }
        };

        debug!(bytes = request.code.len(), "starting code execution");
        let result = self.runner.execute(&request.code).await;

        if result.success {
            info!("code execution completed successfully");
        } else {
            warn!(error = %result.error, "code execution failed");
        }

        result
    }

    pub fn available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn request(code: &str) -> ExecutionRequest {
        ExecutionRequest {
            code: code.to_string(),
        }
    }

    #[tokio::test]
    async fn deterministic_output_is_returned_trimmed() {
        let service = ExecutionService::new(2, RunnerConfig::default());

        let result = service.execute(request("print('hi')")).await;
        assert!(result.success);
        assert_eq!(result.output, "hi");
        assert_eq!(result.error, "");
    }

    #[tokio::test]
    async fn runtime_fault_surfaces_stderr() {
        let service = ExecutionService::new(2, RunnerConfig::default());

        let result = service.execute(request("1/0")).await;
        assert!(!result.success);
        assert_eq!(result.output, "");
        assert!(result.error.contains("ZeroDivisionError"));
    }

    #[tokio::test]
    async fn empty_submission_succeeds_with_empty_output() {
        let service = ExecutionService::new(2, RunnerConfig::default());

        let result = service.execute(request("")).await;
        assert!(result.success);
        assert_eq!(result.output, "");
        assert_eq!(result.error, "");
    }

    #[tokio::test]
    async fn concurrent_submissions_do_not_cross_contaminate() {
        let service = ExecutionService::new(12, RunnerConfig::default());

        let mut handles = vec![];
        for i in 0..12u32 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                let result = service
                    .execute(ExecutionRequest {
                        code: format!("print({} * {})", i, i),
                    })
                    .await;
                (i, result)
            }));
        }

        for handle in handles {
            let (i, result) = handle.await.unwrap();
            assert!(result.success, "submission {} failed: {}", i, result.error);
            assert_eq!(result.output, (i * i).to_string());
        }
    }

    #[tokio::test]
    async fn execution_slots_match_configured_bound() {
        let service = ExecutionService::new(3, RunnerConfig::default());
        assert_eq!(service.available_slots(), 3);
    }

    #[tokio::test]
    async fn looping_submission_hits_the_deadline() {
        let service = ExecutionService::new(
            1,
            RunnerConfig {
                timeout: Duration::from_secs(2),
                ..RunnerConfig::default()
            },
        );

        let result = service.execute(request("while True: pass")).await;
        assert!(!result.success);
        assert_eq!(result.error, "Code execution timed out (max 2 seconds)");
    }

    #[test]
    fn result_serializes_to_the_wire_shape() {
        let result = ExecutionResult::succeeded("  hi\n");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"output": "hi", "error": "", "success": true})
        );
    }
}
