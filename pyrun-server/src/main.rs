use clap::Parser;
use pyrun::RunnerConfig;
use pyrun_server::{create_app, run_server};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to listen on
    #[arg(short, long, default_value = "0.0.0.0:8000")]
    addr: SocketAddr,

    /// Maximum number of concurrent executions
    #[arg(short, long, default_value = "10")]
    max_concurrent: usize,

    /// Interpreter binary used to run submissions
    #[arg(long, default_value = "python3")]
    interpreter: PathBuf,

    /// Wall-clock execution deadline in seconds
    #[arg(long, default_value = "10")]
    timeout_secs: u64,

    /// Cap on captured bytes per output stream
    #[arg(long, default_value = "1048576")] // 1MB
    max_output_bytes: usize,

    /// Directory for staged source files (system temp dir if unset)
    #[arg(long)]
    staging_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = RunnerConfig {
        interpreter: args.interpreter,
        timeout: Duration::from_secs(args.timeout_secs),
        max_output_bytes: args.max_output_bytes,
        staging_dir: args.staging_dir,
    };

    let app = create_app(args.max_concurrent, config);
    run_server(app, args.addr).await?;

    Ok(())
}
