//! Reverse proxy directive generation
//!
//! Each mount describes how an edge proxy in front of the server should
//! treat its URL. The concrete directive language is supplied by a
//! `ProxyDirectiveBuilder`.

mod nginx;

pub use nginx::{NginxContext, NginxDirectives};

use std::path::Path;

pub trait ProxyDirectiveBuilder {
    type Context;
    type Directive;

    /// Serve one file directly from disk
    fn file_directives(
        &self,
        context: &Self::Context,
        url: &str,
        path: &Path,
        gzip: bool,
    ) -> Vec<Self::Directive>;

    /// Serve a directory tree directly from disk
    fn dir_directives(
        &self,
        context: &Self::Context,
        url: &str,
        root: &Path,
        gzip: bool,
    ) -> Vec<Self::Directive>;

    /// Forward to the application server
    fn app_directives(&self, context: &Self::Context, url: &str) -> Vec<Self::Directive>;

    /// Forward a websocket upgrade to the application server
    fn ws_directives(&self, context: &Self::Context, url: &str) -> Vec<Self::Directive>;
}
