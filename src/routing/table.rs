//! Mount table
//!
//! Ordered `(prefix, handler)` pairs, longest prefix first. Registration
//! happens before serving; afterwards the table is only read, so it is shared
//! behind an `Arc` without locking.

use hyper::Response;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use super::matcher::{self, display_prefix, normalize_prefix};
use crate::error::{Error, Result};
use crate::handler::{DirectoryHandler, FileHandler, FunctionHandler, Handler, WebSocketHandler};
use crate::http::{self, Body};
use crate::logger;
use crate::pipeline::Next;
use crate::proxy::ProxyDirectiveBuilder;
use crate::request::{Params, Request};

#[derive(Debug, Clone)]
pub struct Mount {
    prefix: String,
    handler: Arc<Handler>,
}

impl Mount {
    /// Canonical `/seg/` form
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn handler(&self) -> &Arc<Handler> {
        &self.handler
    }
}

#[derive(Debug, Default, Clone)]
pub struct MountTable {
    mounts: Vec<Mount>,
}

impl MountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `handler` under `url`
    ///
    /// Fails with `DuplicateMount` when the normalized prefix is taken. The
    /// sort is stable, so equal-length prefixes keep registration order.
    pub fn register(&mut self, url: &str, handler: impl Into<Arc<Handler>>) -> Result<()> {
        let prefix = normalize_prefix(url);
        if self.mounts.iter().any(|m| m.prefix == prefix) {
            return Err(Error::DuplicateMount { url: prefix });
        }

        let handler = handler.into();
        logger::log_mount_registered(&prefix, &handler);
        self.mounts.push(Mount { prefix, handler });
        self.mounts.sort_by_key(|m| Reverse(m.prefix.len()));
        Ok(())
    }

    /// Mount a single file, skipped when `path` is not a file at this point
    pub fn register_file(
        &mut self,
        url: &str,
        path: impl AsRef<Path>,
        gzip: bool,
        chunk_size: usize,
    ) -> Result<()> {
        let path = path.as_ref();
        if !path.is_file() {
            logger::log_mount_skipped(url, path);
            return Ok(());
        }
        self.register(url, Handler::from(FileHandler::new(path, gzip, chunk_size)))
    }

    /// Mount a directory, skipped when `path` is not a directory at this point
    pub fn register_directory(
        &mut self,
        url: &str,
        path: impl AsRef<Path>,
        gzip: bool,
        chunk_size: usize,
    ) -> Result<()> {
        let path = path.as_ref();
        if !path.is_dir() {
            logger::log_mount_skipped(url, path);
            return Ok(());
        }
        self.register(url, Handler::from(DirectoryHandler::new(path, gzip, chunk_size)))
    }

    pub fn register_application(&mut self, url: &str) -> Result<()> {
        self.register(url, Handler::Application)
    }

    pub fn register_websocket<F>(&mut self, url: &str, on_connect: F) -> Result<()>
    where
        F: Fn(Request, Params) + Send + Sync + 'static,
    {
        self.register(url, Handler::from(WebSocketHandler::new(on_connect)))
    }

    pub fn register_function<F, Fut>(&mut self, url: &str, name: &str, target: F) -> Result<()>
    where
        F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response<Body>> + Send + 'static,
    {
        self.register(url, Handler::from(FunctionHandler::new(name, target)))
    }

    /// Bulk registration from configuration mappings
    ///
    /// `functions` are already resolved by the caller.
    pub fn register_all(
        &mut self,
        files: &BTreeMap<String, String>,
        directories: &BTreeMap<String, String>,
        functions: BTreeMap<String, FunctionHandler>,
        gzip: bool,
        chunk_size: usize,
    ) -> Result<()> {
        for (url, path) in files {
            self.register_file(url, path, gzip, chunk_size)?;
        }
        for (url, path) in directories {
            self.register_directory(url, path, gzip, chunk_size)?;
        }
        for (url, function) in functions {
            self.register(&url, Handler::from(function))?;
        }
        Ok(())
    }

    /// First mount whose prefix matches `path_info`, without touching anything
    pub fn resolve(&self, path_info: &str) -> Option<&Mount> {
        let probe = matcher::probe(path_info);
        self.mounts.iter().find(|m| probe.starts_with(&m.prefix))
    }

    /// Route a request to its mount
    ///
    /// Without a request the call goes straight to `next`. On a match the
    /// request's `script_name` and `path_info` are rewritten before the
    /// handler runs; without one the answer is a 404 naming the path.
    pub async fn dispatch(
        &self,
        next: &dyn Next,
        request: Option<Request>,
        params: Params,
    ) -> Response<Body> {
        let Some(mut request) = request else {
            return next.call(None, params).await;
        };

        let Some(mount) = self.resolve(&request.path_info) else {
            let path = request.path_info.trim_end_matches('/');
            return http::build_404_response(Some(path));
        };

        matcher::rewrite(&mut request, &mount.prefix);
        mount.handler.invoke(next, request, params).await
    }

    /// `(display url, handler)` pairs sorted by url
    pub fn mountpoints(&self) -> Vec<(&str, &Handler)> {
        let mut mountpoints: Vec<_> = self
            .mounts
            .iter()
            .map(|m| (display_prefix(&m.prefix), m.handler.as_ref()))
            .collect();
        mountpoints.sort_by(|a, b| a.0.cmp(b.0));
        mountpoints
    }

    /// Mountpoints for the given display urls, in the order asked
    pub fn mountpoints_for(&self, urls: &[&str]) -> Vec<(&str, &Handler)> {
        let mountpoints = self.mountpoints();
        let mut selected: Vec<(&str, &Handler)> = Vec::new();
        for url in urls {
            if selected.iter().any(|(u, _)| u == url) {
                continue;
            }
            if let Some(found) = mountpoints.iter().find(|(u, _)| u == url) {
                selected.push(*found);
            }
        }
        selected
    }

    /// Directives for every mount, generic handlers before static ones and
    /// longer urls first within a kind
    pub fn generate_proxy_directives<B>(&self, builder: &B, context: &B::Context) -> Vec<B::Directive>
    where
        B: ProxyDirectiveBuilder + ?Sized,
    {
        let mut mountpoints = self.mountpoints();
        mountpoints.sort_by_key(|(url, handler)| (handler.proxy_priority(), Reverse(url.len())));

        mountpoints
            .into_iter()
            .flat_map(|(url, handler)| handler.generate_proxy_directives(builder, context, url))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mount> {
        self.mounts.iter()
    }
}
