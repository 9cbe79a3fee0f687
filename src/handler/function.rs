//! Function endpoints
//!
//! A registered async callable mounted under a URL.

use futures_util::future::BoxFuture;
use hyper::Response;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::http::Body;
use crate::request::{Params, Request};

type Target = Arc<dyn Fn(Request, Params) -> BoxFuture<'static, Response<Body>> + Send + Sync>;

#[derive(Clone)]
pub struct FunctionHandler {
    name: String,
    target: Target,
}

impl FunctionHandler {
    pub fn new<F, Fut>(name: impl Into<String>, target: F) -> Self
    where
        F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response<Body>> + Send + 'static,
    {
        Self {
            name: name.into(),
            target: Arc::new(move |request, params| Box::pin(target(request, params))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Call the target with the rewritten request
    pub async fn invoke(&self, request: Request, params: Params) -> Response<Body> {
        (self.target)(request, params).await
    }
}

impl fmt::Display for FunctionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for FunctionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionHandler")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
