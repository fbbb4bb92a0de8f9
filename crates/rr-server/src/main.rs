//! Road Risk prediction server binary.

use clap::Parser;
use rr_model::{ACCIDENT_RECORDS, SAFE_RECORDS, TRAINING_RECORDS};
use rr_server::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use rr_server::routes::{create_router, AppState, ServerConfig};
use std::sync::Arc;

/// Road Risk - accident likelihood prediction API
#[derive(Parser, Debug)]
#[command(name = "rr-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Host to bind to
    #[arg(long, env = "RR_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to
    #[arg(long, short, env = "RR_PORT", default_value_t = 5000)]
    port: u16,

    /// Log level filter
    #[arg(long, env = "RR_LOG", default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log output format
    #[arg(long, env = "RR_LOG_FORMAT", default_value_t = LogFormat::Human)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();
    init_logging(&LogConfig {
        level: cli.log_level,
        format: cli.log_format,
    });

    let config = ServerConfig {
        host: cli.host,
        port: cli.port,
    };
    let state = Arc::new(AppState::new());

    tracing::info!(
        total_records = TRAINING_RECORDS,
        accidents = ACCIDENT_RECORDS,
        safe = SAFE_RECORDS,
        "accident prediction server starting"
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to install ctrl-c handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
