//! Server lifecycle: logging setup, bind, graceful shutdown

use crate::error::GatewayError;
use crate::routes::routes;
use crate::Gateway;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG`, defaulting to `info`. `json` switches to one JSON
/// object per line.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing already initialized: {e}");
    }
}

/// Bind the listener and return the bound address with the server future.
///
/// The future resolves once `shutdown` completes and in-flight requests
/// have drained.
///
/// # Errors
/// `GatewayError::Bind` if the address is unavailable.
pub fn bind_with_shutdown(
    gateway: Arc<Gateway>,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(SocketAddr, impl Future<Output = ()> + Send), GatewayError> {
    warp::serve(routes(gateway))
        .try_bind_with_graceful_shutdown(addr, shutdown)
        .map_err(|source| GatewayError::Bind { addr, source })
}

/// Serve on the configured address until Ctrl-C or SIGTERM
///
/// # Errors
/// `GatewayError::Bind` if the address is unavailable.
pub async fn serve(gateway: Arc<Gateway>) -> Result<(), GatewayError> {
    let addr = SocketAddr::new(gateway.config().bind_address, gateway.config().port);
    let (bound, server) = bind_with_shutdown(gateway, addr, shutdown_signal())?;

    tracing::info!("Server is running on {bound}");
    server.await;
    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl-C"),
        () = terminate => tracing::info!("Received SIGTERM"),
    }
}
