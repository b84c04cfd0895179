//! Process signal handling.

use crate::services::manager::ServiceManager;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};

/// Blocks until SIGINT or SIGTERM, then drains services.
pub async fn handle_shutdown_signals(manager: ServiceManager, timeout: Duration) -> ExitCode {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install SIGINT handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => error!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }

    manager.shutdown(timeout).await;
    ExitCode::SUCCESS
}
