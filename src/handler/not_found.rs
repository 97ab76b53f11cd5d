//! Fallback handler for unmatched paths
//!
//! Installed by the registry at construction under a reserved name no real
//! route uses, so resolution always has somewhere to land.

use async_trait::async_trait;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use super::{Handler, RequestContext};
use crate::http;
use crate::logger;

/// Handler invoked when no registered route matches the request path
pub struct NotFoundHandler;

impl NotFoundHandler {
    pub const NAME: &'static str = "/InvalidRequestHandler";
    const MESSAGE: &'static str = "Could not find resource.";
}

#[async_trait]
impl Handler for NotFoundHandler {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn handle(&self, ctx: RequestContext) -> Response<Full<Bytes>> {
        logger::log_unresolved_route(ctx.raw_uri());
        http::build_not_found_response(Self::MESSAGE)
    }
}
