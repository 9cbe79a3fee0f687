//! Request handler module
//!
//! The closed set of things a URL prefix can be mounted on. Every variant
//! can be invoked, described and asked for its reverse proxy directives.

pub mod function;
pub mod static_files;
pub mod websocket;

pub use function::FunctionHandler;
pub use static_files::{DirectoryHandler, FileHandler};
pub use websocket::WebSocketHandler;

use hyper::Response;
use std::fmt;

use crate::http::Body;
use crate::pipeline::Next;
use crate::proxy::ProxyDirectiveBuilder;
use crate::request::{Params, Request};

#[derive(Debug, Clone)]
pub enum Handler {
    File(FileHandler),
    Directory(DirectoryHandler),
    /// Only rewrites the routing fields, the next stage answers
    Application,
    WebSocket(WebSocketHandler),
    Function(FunctionHandler),
}

impl Handler {
    pub async fn invoke(&self, next: &dyn Next, request: Request, params: Params) -> Response<Body> {
        match self {
            Self::File(handler) => handler.invoke(&request).await,
            Self::Directory(handler) => handler.invoke(&request).await,
            Self::Application => next.call(Some(request), params).await,
            Self::WebSocket(handler) => handler.invoke(request, params),
            Self::Function(handler) => handler.invoke(request, params).await,
        }
    }

    /// Directive ordering rank, lower goes first
    pub const fn proxy_priority(&self) -> u8 {
        match self {
            Self::Application | Self::Function(_) => 0,
            Self::WebSocket(_) => 1,
            Self::File(_) => 2,
            Self::Directory(_) => 3,
        }
    }

    pub fn generate_proxy_directives<B>(
        &self,
        builder: &B,
        context: &B::Context,
        url: &str,
    ) -> Vec<B::Directive>
    where
        B: ProxyDirectiveBuilder + ?Sized,
    {
        match self {
            Self::File(handler) => {
                builder.file_directives(context, url, handler.path(), handler.gzip())
            }
            Self::Directory(handler) => {
                builder.dir_directives(context, url, handler.root(), handler.gzip())
            }
            Self::Application | Self::Function(_) => builder.app_directives(context, url),
            Self::WebSocket(_) => builder.ws_directives(context, url),
        }
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(handler) => fmt::Display::fmt(handler, f),
            Self::Directory(handler) => fmt::Display::fmt(handler, f),
            Self::Application => f.write_str("<application>"),
            Self::WebSocket(handler) => fmt::Display::fmt(handler, f),
            Self::Function(handler) => fmt::Display::fmt(handler, f),
        }
    }
}

impl From<FileHandler> for Handler {
    fn from(handler: FileHandler) -> Self {
        Self::File(handler)
    }
}

impl From<DirectoryHandler> for Handler {
    fn from(handler: DirectoryHandler) -> Self {
        Self::Directory(handler)
    }
}

impl From<WebSocketHandler> for Handler {
    fn from(handler: WebSocketHandler) -> Self {
        Self::WebSocket(handler)
    }
}

impl From<FunctionHandler> for Handler {
    fn from(handler: FunctionHandler) -> Self {
        Self::Function(handler)
    }
}
