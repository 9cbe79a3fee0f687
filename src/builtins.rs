//! Named handlers that configuration can refer to
//!
//! `statics.mountpoints` values name functions and `statics.websockets`
//! values name connection callbacks. Both are looked up here when the mount
//! table is built.

use futures_util::{future, StreamExt, TryStreamExt};
use hyper::StatusCode;
use hyper_util::rt::TokioIo;
use std::collections::{BTreeMap, HashMap};
use tokio_tungstenite::tungstenite::protocol::Role;
use tokio_tungstenite::WebSocketStream;

use crate::config::StaticsConfig;
use crate::error::{Error, Result};
use crate::handler::{FunctionHandler, Handler, WebSocketHandler};
use crate::http;
use crate::logger;
use crate::request::{Params, Request};
use crate::routing::MountTable;

#[derive(Debug, Default, Clone)]
pub struct Registry {
    functions: HashMap<String, FunctionHandler>,
    websockets: HashMap<String, WebSocketHandler>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `health`, `echo` and the `echo` websocket
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.add_function(FunctionHandler::new("health", |_, _| async {
            http::build_text_response(StatusCode::OK, "ok")
        }));
        registry.add_function(FunctionHandler::new("echo", |request: Request, _| async move {
            http::build_text_response(
                StatusCode::OK,
                format!(
                    "script_name={}\npath_info={}\n",
                    request.script_name, request.path_info
                ),
            )
        }));
        registry.add_websocket("echo", WebSocketHandler::new(echo_socket));
        registry
    }

    /// Add a function under its own name, replacing any previous one
    pub fn add_function(&mut self, handler: FunctionHandler) {
        self.functions.insert(handler.name().to_string(), handler);
    }

    pub fn add_websocket(&mut self, name: impl Into<String>, handler: WebSocketHandler) {
        self.websockets.insert(name.into(), handler);
    }

    pub fn function(&self, reference: &str) -> Result<FunctionHandler> {
        self.functions
            .get(reference)
            .cloned()
            .ok_or_else(|| Error::UnknownReference {
                kind: "function",
                reference: reference.to_string(),
            })
    }

    pub fn websocket(&self, name: &str) -> Result<WebSocketHandler> {
        self.websockets
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownReference {
                kind: "websocket",
                reference: name.to_string(),
            })
    }
}

/// Build the mount table described by the `statics` section
///
/// Every reference is resolved before anything is registered, so an unknown
/// name fails startup without a half-built table.
pub fn build_mount_table(statics: &StaticsConfig, registry: &Registry) -> Result<MountTable> {
    let functions = statics
        .mountpoints
        .iter()
        .map(|(url, reference)| Ok((url.clone(), registry.function(reference)?)))
        .collect::<Result<BTreeMap<_, _>>>()?;
    let websockets = statics
        .websockets
        .iter()
        .map(|(url, name)| Ok((url.clone(), registry.websocket(name)?)))
        .collect::<Result<Vec<_>>>()?;

    let mut table = MountTable::new();
    table.register_all(
        &statics.files,
        &statics.directories,
        functions,
        statics.gzip,
        statics.chunk_size,
    )?;
    for url in &statics.applications {
        table.register_application(url)?;
    }
    for (url, handler) in websockets {
        table.register(&url, Handler::from(handler))?;
    }
    Ok(table)
}

/// Echo every text and binary frame back to the sender
fn echo_socket(mut request: Request, _params: Params) {
    let on_upgrade = request.on_upgrade();
    tokio::spawn(async move {
        let upgraded = match on_upgrade.await {
            Ok(upgraded) => upgraded,
            Err(e) => {
                logger::log_warning(&format!("WebSocket upgrade failed: {e}"));
                return;
            }
        };

        let socket = WebSocketStream::from_raw_socket(TokioIo::new(upgraded), Role::Server, None).await;
        let (sink, stream) = socket.split();
        if let Err(e) = stream
            .try_filter(|message| future::ready(message.is_text() || message.is_binary()))
            .forward(sink)
            .await
        {
            logger::log_warning(&format!("WebSocket echo closed: {e}"));
        }
    });
}
