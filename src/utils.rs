//! Shared runtime utilities.

use tracing::{error, info};

/// Resolve when the process receives Ctrl-C.
///
/// Used as the graceful-shutdown future for the HTTP server. A failure to
/// install the signal handler is logged and treated as a shutdown request.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => error!(error = %err, "Failed to listen for shutdown signal"),
    }
}
