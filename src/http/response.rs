//! HTTP response building module
//!
//! Provides builders for the status code responses produced by the dispatch
//! layer, decoupled from specific handlers.

use hyper::header::{self, HeaderValue};
use hyper::{Response, StatusCode};

use super::body::{self, Body};

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str, last_modified: &str) -> Response<Body> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(header::ETAG, etag)
        .header(header::LAST_MODIFIED, last_modified)
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(body::empty())
        })
}

/// Build 404 Not Found response
///
/// `comment` carries the unmatched path for diagnostics.
pub fn build_404_response(comment: Option<&str>) -> Response<Body> {
    let text = match comment {
        Some(path) => format!("404 Not Found: {path}"),
        None => "404 Not Found".to_string(),
    };

    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(body::full(text))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(body::full("404 Not Found"))
        })
}

/// Build 400 Bad Request response
pub fn build_400_response(reason: &str) -> Response<Body> {
    Response::builder()
        .status(StatusCode::BAD_REQUEST)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(body::full(format!("400 Bad Request: {reason}")))
        .unwrap_or_else(|e| {
            log_build_error("400", &e);
            Response::new(body::full("400 Bad Request"))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Body> {
    Response::builder()
        .status(StatusCode::PAYLOAD_TOO_LARGE)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(body::full("413 Payload Too Large"))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            Response::new(body::full("413 Payload Too Large"))
        })
}

/// Build 101 Switching Protocols response for a websocket handshake
pub fn build_101_response(accept_key: &str) -> Response<Body> {
    Response::builder()
        .status(StatusCode::SWITCHING_PROTOCOLS)
        .header(header::CONNECTION, "Upgrade")
        .header(header::UPGRADE, "websocket")
        .header(header::SEC_WEBSOCKET_ACCEPT, accept_key)
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("101", &e);
            Response::new(body::empty())
        })
}

/// Build plain text response
pub fn build_text_response(status: StatusCode, text: impl Into<String>) -> Response<Body> {
    let text = text.into();
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(header::CONTENT_LENGTH, text.len())
        .body(body::full(text))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(body::empty())
        })
}

/// Stamp the `Server` header on an outgoing response
pub fn set_server_header(response: &mut Response<Body>, server_name: &str) {
    if let Ok(value) = HeaderValue::from_str(server_name) {
        response.headers_mut().insert(header::SERVER, value);
    }
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
