// Connection handling module
// Serves one TCP connection: limits, HTTP/1.1 with upgrades, dispatch, access log

use http_body_util::{BodyExt, Limited};
use hyper::body::Incoming;
use hyper::header;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Response;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::ServerState;
use crate::http::{self, response::set_server_header, Body};
use crate::logger::{self, AccessLogEntry};
use crate::pipeline::NotFoundNext;
use crate::routing::display_prefix;
use crate::request::{Params, Request};

/// Accept a connection unless the connection limit is reached.
///
/// The counter is incremented first and rolled back on rejection, so two
/// racing accepts cannot both slip past the limit.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<ServerState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);
    handle_connection(stream, peer_addr, Arc::clone(state), Arc::clone(conn_counter));
}

/// Serve a single connection in a spawned task.
///
/// Upgrades are enabled so websocket mounts can take the socket over once
/// their `101` response is written. `read_timeout` bounds how long a request
/// head may take to arrive; a response body streams for as long as it needs.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<ServerState>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .keep_alive(state.config.performance.keep_alive)
            .header_read_timeout(header_timeout(state.config.performance.read_timeout));

        let service_state = Arc::clone(&state);
        let conn = builder
            .serve_connection(
                io,
                service_fn(move |req| handle_request(req, Arc::clone(&service_state), peer_addr)),
            )
            .with_upgrades();

        if let Err(err) = conn.await {
            if err.is_timeout() {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} sent no request head within {} seconds",
                    state.config.performance.read_timeout
                ));
            } else {
                logger::log_connection_error(&err);
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Header read timeout for `read_timeout` seconds, 0 disables it
fn header_timeout(read_timeout: u64) -> Option<Duration> {
    (read_timeout > 0).then(|| Duration::from_secs(read_timeout))
}

/// Collect the body, dispatch through the mount table and log the exchange
pub async fn handle_request(
    req: hyper::Request<Incoming>,
    state: Arc<ServerState>,
    peer_addr: SocketAddr,
) -> Result<Response<Body>, Infallible> {
    let started = Instant::now();
    let mut entry = AccessLogEntry::for_request(peer_addr.ip(), &req);

    let mut response = match read_request(req, state.config.http.max_body_size).await {
        Some(request) => {
            entry.mount = state
                .table
                .resolve(&request.path_info)
                .map(|mount| display_prefix(mount.prefix()).to_string());
            state
                .table
                .dispatch(&NotFoundNext, Some(request), Params::new())
                .await
        }
        None => http::build_413_response(),
    };
    set_server_header(&mut response, &state.config.http.server_name);

    if state.config.logging.access_log {
        entry.finish(&response, started.elapsed());
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Buffer the request body, `None` when it exceeds `max_body_size`
async fn read_request(req: hyper::Request<Incoming>, max_body_size: u64) -> Option<Request> {
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);

    let declared = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    if declared.is_some_and(|len| len > max_body_size) {
        return None;
    }

    let (parts, incoming) = req.into_parts();
    match Limited::new(incoming, limit).collect().await {
        Ok(collected) => Some(Request::from_parts(parts, collected.to_bytes())),
        Err(e) => {
            logger::log_warning(&format!("Request body rejected: {e}"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_timeout() {
        assert_eq!(header_timeout(0), None);
        assert_eq!(header_timeout(30), Some(Duration::from_secs(30)));
    }
}
