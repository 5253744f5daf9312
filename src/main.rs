use std::process::ExitCode;
use tandem::server::SignalListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting the application"
    );

    let signals = match SignalListener::register() {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "Failed to register signal handlers");
            return Err(anyhow::anyhow!("signal handler error: {}", e));
        }
    };

    let outcome = tandem::process::run(|var| std::env::var(var).ok(), signals.recv()).await?;

    Ok(outcome.exit_code())
}
