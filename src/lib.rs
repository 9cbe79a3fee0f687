//! Longest-prefix request dispatch with conditional static file serving.
//!
//! A [`MountTable`] maps URL prefixes to handlers (files, directories,
//! applications, websocket endpoints and functions). Dispatch rewrites the
//! request's `script_name` / `path_info` for the matched mount and invokes
//! its handler, or hands over to the next pipeline stage.

pub mod builtins;
pub mod cli;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod pipeline;
pub mod proxy;
pub mod request;
pub mod routing;
pub mod server;

pub use error::{Error, Result};
pub use handler::Handler;
pub use pipeline::{Next, NotFoundNext};
pub use request::{Params, Request};
pub use routing::MountTable;
