//! Request handler module
//!
//! Defines the contract every route handler implements and the request
//! context handed to it by the dispatch core.

pub mod greeting;
pub mod not_found;

use async_trait::async_trait;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::collections::HashMap;

pub use greeting::{AfternoonHandler, MorningHandler};
pub use not_found::NotFoundHandler;

/// Request data exposed to handlers: the exact request path plus the
/// decoded query parameters.
#[derive(Debug, Clone)]
pub struct RequestContext {
    path: String,
    raw_uri: String,
    params: HashMap<String, String>,
}

impl RequestContext {
    pub fn new(uri: &hyper::Uri) -> Self {
        Self {
            path: uri.path().to_string(),
            raw_uri: uri.to_string(),
            params: crate::http::query::parse(uri.query()),
        }
    }

    /// Exact request path, used as the dispatch key
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path and query as received, for logging
    pub fn raw_uri(&self) -> &str {
        &self.raw_uri
    }

    /// Decoded query parameter by name
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Contract implemented by every route handler.
///
/// `name` is the exact dispatch key; it must start with `/` because the
/// registry compares it verbatim against the incoming request path.
/// `handle` must return a complete response on every code path, error
/// paths included, or the client is left waiting.
#[async_trait]
pub trait Handler: Send + Sync {
    fn name(&self) -> &'static str;

    async fn handle(&self, ctx: RequestContext) -> Response<Full<Bytes>>;
}
