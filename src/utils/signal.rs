use tokio::signal;

/// Resolves once Ctrl+C is received, letting axum drain in-flight requests.
pub async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }

    #[cfg(not(windows))]
    println!();
    tracing::info!("Ctrl+C received, shutting down.");
}
