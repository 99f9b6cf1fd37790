//! Whiteboard Broker entry point
//!
//! Run with:
//! ```bash
//! cargo run -p whiteboard-broker
//! ```
//!
//! Configuration is loaded from environment variables.

use tracing::{error, info};
use whiteboard_common::{try_init_tracing_with_config, AppConfig, AppError, TracingConfig};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, code = e.error_code(), "Broker failed");
        eprintln!("whiteboard-broker: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.broker.address(),
        binding_name = %config.publisher.binding_name,
        "Configuration loaded"
    );

    whiteboard_broker::run(config).await
}
