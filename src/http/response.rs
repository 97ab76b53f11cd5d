//! HTTP response building module
//!
//! Builders for the plain-text responses the dispatch core produces.
//! Returning the built response to the connection task is what completes
//! the exchange, so every builder yields a full, ready-to-send response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Build 200 OK plain-text response
pub fn build_text_response(message: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(200)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(message)))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_not_found_response(message: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(message)))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from(message)))
        })
}

/// Build 401 Unauthorized response, sent before dispatch when the trust
/// check fails
pub fn build_unauthorized_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(401)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from("401 Unauthorized")))
        .unwrap_or_else(|e| {
            log_build_error("401", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
