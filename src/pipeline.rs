//! Pipeline continuation
//!
//! The mount table is one link in a chain. `Next` is the rest of the chain:
//! it receives the (possibly rewritten) request, or `None` when dispatch runs
//! outside an HTTP context.

use futures_util::future::BoxFuture;
use hyper::Response;
use std::future::Future;

use crate::http::{self, Body};
use crate::request::{Params, Request};

pub trait Next: Send + Sync {
    fn call(&self, request: Option<Request>, params: Params) -> BoxFuture<'_, Response<Body>>;
}

impl<F, Fut> Next for F
where
    F: Fn(Option<Request>, Params) -> Fut + Send + Sync,
    Fut: Future<Output = Response<Body>> + Send + 'static,
{
    fn call(&self, request: Option<Request>, params: Params) -> BoxFuture<'_, Response<Body>> {
        Box::pin(self(request, params))
    }
}

/// End of the chain: nothing after the mount table, answer 404
#[derive(Debug, Default, Clone, Copy)]
pub struct NotFoundNext;

impl Next for NotFoundNext {
    fn call(&self, request: Option<Request>, _params: Params) -> BoxFuture<'_, Response<Body>> {
        let path = request.map(|r| format!("{}{}", r.script_name, r.path_info));
        Box::pin(async move { http::build_404_response(path.as_deref()) })
    }
}
