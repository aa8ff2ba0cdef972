use axum::Router;
use log::{info, warn};
use tokio::net::TcpListener;
use tokio::signal;

use super::error::ServerError;

/// Bind `address` and serve `app` until SIGINT/SIGTERM.
pub async fn serve(app: Router, address: &str) -> Result<(), ServerError> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| ServerError::Bind {
            address: address.to_string(),
            source: e,
        })?;
    serve_on(listener, app).await
}

/// Serve `app` on an already bound listener until SIGINT/SIGTERM.
pub async fn serve_on(listener: TcpListener, app: Router) -> Result<(), ServerError> {
    info!("Listening on {}", listener.local_addr()?);
    info!("  - POST /predict  (classify one description)");
    info!("  - GET  /health   (health check)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for SIGTERM or SIGINT (Ctrl+C) for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, initiating graceful shutdown"),
        () = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
