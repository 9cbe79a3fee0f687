//! Logger module
//!
//! Thin facade over `tracing` used by the rest of the crate:
//! - Subscriber initialisation from the logging configuration
//! - Server lifecycle and mount registration events
//! - Access logging with multiple formats
//! - Error and warning logging

mod format;

pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use std::net::SocketAddr;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Target used for access log lines, so they can be filtered separately
pub const ACCESS_TARGET: &str = "pathmount::access";

/// Initialize the global subscriber
///
/// `RUST_LOG` wins over the configured level when set. Should be called once
/// at application startup.
pub fn init(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!(
        address = %addr,
        workers = ?config.server.workers,
        max_connections = ?config.performance.max_connections,
        "Server listening on http://{addr}"
    );
}

pub fn log_server_stop() {
    tracing::info!("Shutdown signal received, no longer accepting connections");
}

pub fn log_mount_registered(url: &str, handler: &impl std::fmt::Display) {
    tracing::debug!(url, handler = %handler, "Mount registered");
}

pub fn log_mount_skipped(url: &str, path: &Path) {
    tracing::debug!(url, path = %path.display(), "Static path missing, mount skipped");
}

/// A directory mount refused a path: `warn` when it tried to leave the
/// root, `debug` for the root itself
pub fn log_path_rejected(root: &Path, path_info: &str, escape: bool) {
    if escape {
        tracing::warn!(root = %root.display(), path_info, "Path escapes the served root");
    } else {
        tracing::debug!(root = %root.display(), path_info, "Served root is not a file");
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!(peer = %peer_addr, "Connection accepted");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: ACCESS_TARGET, "{}", entry.format(format));
}
