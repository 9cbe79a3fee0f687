//! WebSocket endpoints
//!
//! The handshake is answered here; the registered callback receives the
//! request, takes its upgrade future and owns the connection from then on.

use hyper::header;
use hyper::Response;
use std::fmt;
use std::sync::Arc;
use tokio_tungstenite::tungstenite::handshake::derive_accept_key;

use crate::http::{self, Body};
use crate::request::{Params, Request};

type OnConnect = Arc<dyn Fn(Request, Params) + Send + Sync>;

#[derive(Clone)]
pub struct WebSocketHandler {
    on_connect: OnConnect,
}

impl WebSocketHandler {
    pub fn new<F>(on_connect: F) -> Self
    where
        F: Fn(Request, Params) + Send + Sync + 'static,
    {
        Self {
            on_connect: Arc::new(on_connect),
        }
    }

    /// Validate the handshake, hand the request over and answer `101`
    ///
    /// The callback is not called for a request that is not a websocket
    /// upgrade.
    pub fn invoke(&self, request: Request, params: Params) -> Response<Body> {
        let is_upgrade = request
            .header(header::UPGRADE)
            .is_some_and(|v| v.eq_ignore_ascii_case("websocket"));
        if !is_upgrade {
            return http::build_400_response("expected a websocket upgrade");
        }

        let Some(key) = request.header(header::SEC_WEBSOCKET_KEY) else {
            return http::build_400_response("missing Sec-WebSocket-Key");
        };
        let accept_key = derive_accept_key(key.as_bytes());

        (self.on_connect)(request, params);
        http::build_101_response(&accept_key)
    }
}

impl fmt::Display for WebSocketHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<websocket>")
    }
}

impl fmt::Debug for WebSocketHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebSocketHandler").finish_non_exhaustive()
    }
}
