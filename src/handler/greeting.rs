//! Greeting route handlers
//!
//! `/Morning` and `/Afternoon` answer with a greeting for the `name` query
//! parameter, or greet a stranger when the parameter is absent.

use async_trait::async_trait;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use super::{Handler, RequestContext};
use crate::http;

/// Handler for the `/Morning` route
pub struct MorningHandler;

impl MorningHandler {
    pub const NAME: &'static str = "/Morning";
}

#[async_trait]
impl Handler for MorningHandler {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn handle(&self, ctx: RequestContext) -> Response<Full<Bytes>> {
        http::build_text_response(greeting_message("Good morning", ctx.param("name")))
    }
}

/// Handler for the `/Afternoon` route
pub struct AfternoonHandler;

impl AfternoonHandler {
    pub const NAME: &'static str = "/Afternoon";
}

#[async_trait]
impl Handler for AfternoonHandler {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn handle(&self, ctx: RequestContext) -> Response<Full<Bytes>> {
        http::build_text_response(greeting_message("Good afternoon", ctx.param("name")))
    }
}

fn greeting_message(greeting: &str, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{greeting} {name}!"),
        None => format!("{greeting} stranger!"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_text(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn context(uri: &str) -> RequestContext {
        RequestContext::new(&uri.parse().unwrap())
    }

    #[tokio::test]
    async fn test_morning_with_name() {
        let response = MorningHandler.handle(context("/Morning?name=Ada")).await;
        assert_eq!(response.status(), 200);
        assert_eq!(body_text(response).await, "Good morning Ada!");
    }

    #[tokio::test]
    async fn test_morning_without_name() {
        let response = MorningHandler.handle(context("/Morning")).await;
        assert_eq!(response.status(), 200);
        assert_eq!(body_text(response).await, "Good morning stranger!");
    }

    #[tokio::test]
    async fn test_afternoon_with_name() {
        let response = AfternoonHandler.handle(context("/Afternoon?name=Grace")).await;
        assert_eq!(response.status(), 200);
        assert_eq!(body_text(response).await, "Good afternoon Grace!");
    }

    #[tokio::test]
    async fn test_afternoon_without_name() {
        let response = AfternoonHandler.handle(context("/Afternoon")).await;
        assert_eq!(response.status(), 200);
        assert_eq!(body_text(response).await, "Good afternoon stranger!");
    }

    #[test]
    fn test_handler_names_are_paths() {
        assert_eq!(MorningHandler.name(), "/Morning");
        assert_eq!(AfternoonHandler.name(), "/Afternoon");
    }
}
