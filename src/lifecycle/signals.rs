//! OS signal handling.

/// Resolve once Ctrl+C (SIGINT) is received.
pub async fn wait_for_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Interrupt received");
}
