// Server module entry point
// Accept loop around a shared, read-only mount table

pub mod connection;
pub mod listener;
pub mod signal;

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::error::Result;
use crate::logger;
use crate::routing::MountTable;

pub use listener::{create_reusable_listener, DEFAULT_BACKLOG};

/// Everything a connection task needs, shared without locks
#[derive(Debug)]
pub struct ServerState {
    pub config: Config,
    pub table: MountTable,
}

/// Bind the configured address and serve until a shutdown signal
pub async fn run(config: Config, table: MountTable) -> Result<()> {
    let addr = config.get_socket_addr()?;
    let listener = create_reusable_listener(addr, DEFAULT_BACKLOG)?;
    logger::log_server_start(&addr, &config);

    let state = Arc::new(ServerState { config, table });
    serve(listener, state, signal::shutdown_signal()).await;
    Ok(())
}

/// Accept connections until `shutdown` resolves
///
/// Connections already being served finish in their own tasks.
pub async fn serve(
    listener: TcpListener,
    state: Arc<ServerState>,
    shutdown: impl std::future::Future<Output = ()>,
) {
    let active_connections = Arc::new(AtomicUsize::new(0));
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = &mut shutdown => {
                logger::log_server_stop();
                break;
            }
        }
    }
}
