use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use pyrun::{ExecutionRequest, ExecutionResult, ExecutionService, RunnerConfig};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind listener: {0}")]
    Bind(std::io::Error),
    #[error("Server error: {0}")]
    Serve(std::io::Error),
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ExecuteRequest {
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExecuteResponse {
    pub output: String,
    pub error: String,
    pub success: bool,
}

impl From<ExecutionResult> for ExecuteResponse {
    fn from(result: ExecutionResult) -> Self {
        Self {
            output: result.output,
            error: result.error,
            success: result.success,
        }
    }
}

#[derive(Clone)]
struct AppState {
    service: ExecutionService,
}

/// Build the application router. All origins are allowed, matching the
/// original service's open CORS policy; no route requires authentication.
pub fn create_app(max_concurrent_executions: usize, config: RunnerConfig) -> Router {
    let state = AppState {
        service: ExecutionService::new(max_concurrent_executions, config),
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/execute", post(execute))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), ServerError> {
    info!("starting code execution server on {}", addr);
    let listener = TcpListener::bind(addr).await.map_err(ServerError::Bind)?;

    axum::serve(listener, app).await.map_err(ServerError::Serve)
}

async fn health_check() -> &'static str {
    "OK"
}

/// Always responds 200; the success/failure distinction lives in the body,
/// not the status code.
async fn execute(
    State(state): State<AppState>,
    Json(payload): Json<ExecuteRequest>,
) -> Json<ExecuteResponse> {
    let request = ExecutionRequest { code: payload.code };
    Json(state.service.execute(request).await.into())
}
