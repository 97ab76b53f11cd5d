//! Handler registry module
//!
//! Owns the exact-match table from request path to handler. Lookup falls
//! back to the not-found handler, so resolution always yields something
//! usable.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::handler::{Handler, NotFoundHandler};

/// Path-to-handler dispatch table with a built-in fallback entry.
///
/// `register` and `resolve` take the same lock, so routes may be added
/// while the server is already accepting connections. Registration under
/// an existing name silently replaces the previous handler.
pub struct HandlerRegistry {
    handlers: RwLock<HashMap<&'static str, Arc<dyn Handler>>>,
}

impl HandlerRegistry {
    /// Create a registry containing only the fallback handler
    pub fn new() -> Self {
        let registry = Self {
            handlers: RwLock::new(HashMap::new()),
        };
        registry.register(Arc::new(NotFoundHandler));
        registry
    }

    /// Insert or replace the entry keyed by the handler's name
    pub fn register(&self, handler: Arc<dyn Handler>) {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        handlers.insert(handler.name(), handler);
    }

    /// Exact-match lookup, falling back to the not-found handler when the
    /// path is not registered
    pub fn resolve(&self, path: &str) -> Arc<dyn Handler> {
        let handlers = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(handler) = handlers.get(path) {
            return Arc::clone(handler);
        }

        handlers.get(NotFoundHandler::NAME).map_or_else(
            || Arc::new(NotFoundHandler) as Arc<dyn Handler>,
            Arc::clone,
        )
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::RequestContext;
    use async_trait::async_trait;
    use http_body_util::{BodyExt, Full};
    use hyper::body::Bytes;
    use hyper::Response;

    struct StaticHandler {
        name: &'static str,
        body: &'static str,
    }

    #[async_trait]
    impl Handler for StaticHandler {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn handle(&self, _ctx: RequestContext) -> Response<Full<Bytes>> {
            crate::http::build_text_response(self.body.to_string())
        }
    }

    async fn body_text(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_resolve_registered_handler() {
        let registry = HandlerRegistry::new();
        registry.register(Arc::new(StaticHandler {
            name: "/Ping",
            body: "pong",
        }));

        assert_eq!(registry.resolve("/Ping").name(), "/Ping");
    }

    #[test]
    fn test_resolve_unregistered_path_falls_back() {
        let registry = HandlerRegistry::new();
        registry.register(Arc::new(StaticHandler {
            name: "/Ping",
            body: "pong",
        }));

        assert_eq!(registry.resolve("/Nope").name(), NotFoundHandler::NAME);
    }

    #[test]
    fn test_resolve_is_exact_match() {
        let registry = HandlerRegistry::new();
        registry.register(Arc::new(StaticHandler {
            name: "/Ping",
            body: "pong",
        }));

        assert_eq!(registry.resolve("/Ping/").name(), NotFoundHandler::NAME);
        assert_eq!(registry.resolve("/ping").name(), NotFoundHandler::NAME);
    }

    #[tokio::test]
    async fn test_duplicate_registration_replaces() {
        let registry = HandlerRegistry::new();
        registry.register(Arc::new(StaticHandler {
            name: "/Ping",
            body: "first",
        }));
        registry.register(Arc::new(StaticHandler {
            name: "/Ping",
            body: "second",
        }));

        let ctx = RequestContext::new(&"/Ping".parse().unwrap());
        let response = registry.resolve("/Ping").handle(ctx).await;
        assert_eq!(body_text(response).await, "second");
    }

    #[test]
    fn test_new_registry_contains_fallback() {
        let registry = HandlerRegistry::new();
        assert_eq!(registry.resolve("/anything").name(), NotFoundHandler::NAME);
    }

    #[tokio::test]
    async fn test_fallback_name_can_be_overridden() {
        let registry = HandlerRegistry::new();
        registry.register(Arc::new(StaticHandler {
            name: NotFoundHandler::NAME,
            body: "custom miss",
        }));

        let ctx = RequestContext::new(&"/missing".parse().unwrap());
        let response = registry.resolve("/missing").handle(ctx).await;
        assert_eq!(body_text(response).await, "custom miss");
    }
}
