use tokio::signal;

/// Resolves on Ctrl+C or, on unix, SIGTERM.
pub async fn wait_for_shutdown() {
    tokio::select! {
        () = ctrl_c() => {}
        () = sigterm() => {}
    }
    tracing::info!("shutdown signal received, draining connections");
}

async fn ctrl_c() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(%e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn sigterm() {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            tracing::error!(%e, "failed to install SIGTERM handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn sigterm() {
    std::future::pending::<()>().await;
}
