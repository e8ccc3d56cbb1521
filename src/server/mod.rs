mod routes;

pub use routes::{router, AppState};

use crate::error::ServerError;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Serve `app` on `addr` until Ctrl-C, then drain in-flight requests
pub async fn serve(addr: &str, app: Router) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    match listener.local_addr() {
        Ok(local) => info!("Listening on http://{}", local),
        Err(_) => info!("Listening on http://{}", addr),
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
