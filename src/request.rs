//! Routable request handle
//!
//! Dispatch owns the request while it travels through the mount table. Only
//! `script_name` and `path_info` are rewritten on a match; everything else is
//! carried through untouched.

use hyper::body::Bytes;
use hyper::http::request::Parts;
use hyper::http::Extensions;
use hyper::{HeaderMap, Method, Uri};
use std::collections::HashMap;

/// Ambient call parameters passed alongside a request
pub type Params = HashMap<String, String>;

#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    /// Path already consumed by routing
    pub script_name: String,
    /// Residual path still to be routed
    pub path_info: String,
    pub body: Bytes,
    extensions: Extensions,
}

impl Request {
    /// Bare request with an empty `script_name`, used by tests and nested dispatch
    pub fn new(method: Method, path_info: impl Into<String>) -> Self {
        Self {
            method,
            uri: Uri::default(),
            headers: HeaderMap::new(),
            script_name: String::new(),
            path_info: path_info.into(),
            body: Bytes::new(),
            extensions: Extensions::new(),
        }
    }

    /// Build from a hyper request head and its collected body
    ///
    /// `path_info` is the percent-decoded URI path; a path that does not
    /// decode to UTF-8 is kept raw.
    pub fn from_parts(parts: Parts, body: Bytes) -> Self {
        let raw = parts.uri.path();
        let path_info = urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |p| p.into_owned());

        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            script_name: String::new(),
            path_info,
            body,
            extensions: parts.extensions,
        }
    }

    /// Header value as text, `None` when absent or not visible ASCII
    pub fn header(&self, name: impl hyper::header::AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Take the connection upgrade future out of this request
    ///
    /// Resolves once the `101` response has been written. On a request that
    /// did not come from a hyper connection the future resolves to an error.
    pub fn on_upgrade(&mut self) -> hyper::upgrade::OnUpgrade {
        let mut probe = hyper::Request::new(());
        std::mem::swap(probe.extensions_mut(), &mut self.extensions);
        let on_upgrade = hyper::upgrade::on(&mut probe);
        std::mem::swap(probe.extensions_mut(), &mut self.extensions);
        on_upgrade
    }
}
