/// Server supervisor — bind, accept, spawn one session task per
/// connection, stop accepting on Ctrl-C.
use std::path::Path;

use tokio::net::TcpListener;
use tracing::{info, warn};

use super::log::ChatLog;
use super::registry::Registry;
use super::session;

/// Port used when no argument is given (or it doesn't parse).
pub const DEFAULT_PORT: u16 = 7440;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Bind `addr` and serve until shutdown. Failing to bind is the only
/// fatal startup error.
pub async fn run(addr: &str, log_path: &Path) -> Result<(), BoxError> {
    let listener = TcpListener::bind(addr).await?;
    info!("tidepool listening on {addr}");
    serve(listener, log_path).await
}

/// Accept connections on an already-bound listener.
///
/// Split out from [`run`] so tests can bind an ephemeral port first.
/// An interrupt signal stops the accept loop; sessions already running
/// continue until their own natural termination.
pub async fn serve(listener: TcpListener, log_path: &Path) -> Result<(), BoxError> {
    let registry = Registry::new();
    let log = ChatLog::open(log_path);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (socket, addr) = accepted?;
                info!(%addr, "new connection");
                let registry = registry.clone();
                let log = log.clone();
                tokio::spawn(async move {
                    if let Err(e) = session::handle_client(socket, addr, registry, log).await {
                        warn!(%addr, "client error: {e}");
                    }
                    info!(%addr, "disconnected");
                });
            }

            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received, no longer accepting connections");
                break;
            }
        }
    }

    Ok(())
}
