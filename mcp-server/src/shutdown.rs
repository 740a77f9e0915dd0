//! Graceful shutdown trigger: Ctrl-C or SIGTERM, whichever comes first.

/// Resolves once the process receives Ctrl-C or (on Unix) SIGTERM, so
/// `axum::serve`'s graceful shutdown can stop accepting new connections
/// while letting in-flight SSE streams finish.
pub async fn signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
