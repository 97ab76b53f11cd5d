// Connection dispatch module
// Each accepted connection gets its own spawned task; the task runs the
// trust check, resolves the handler through the registry, and serves the
// exchange. Nothing is reported back to the accept loop.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tokio_rustls::TlsAcceptor;

use crate::handler::RequestContext;
use crate::http;
use crate::logger;
use crate::registry::HandlerRegistry;

/// Hand an accepted connection to its own task.
///
/// Returns immediately so the accept loop can go back to waiting for the
/// next connection regardless of how long the handler takes.
pub fn dispatch_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    tls: Option<TlsAcceptor>,
    registry: Arc<HandlerRegistry>,
    access_log: bool,
) {
    tokio::spawn(async move {
        if access_log {
            logger::log_connection_accepted(&peer_addr);
        }

        match tls {
            Some(acceptor) => serve_tls(stream, peer_addr, acceptor, registry).await,
            None => serve_plain(stream, registry).await,
        }
    });
}

async fn serve_plain(stream: TcpStream, registry: Arc<HandlerRegistry>) {
    let io = TokioIo::new(stream);
    let conn = http1::Builder::new().serve_connection(
        io,
        service_fn(move |req| handle_request(req, Arc::clone(&registry))),
    );

    if let Err(err) = conn.await {
        logger::log_connection_error(&err);
    }
}

/// Complete the handshake and require a client credential before any
/// dispatch happens.
///
/// A certificate that fails chain validation is rejected by the verifier
/// inside the handshake. A client that presented none completes the
/// handshake but only ever receives 401 and the connection is not kept
/// alive.
async fn serve_tls(
    stream: TcpStream,
    peer_addr: SocketAddr,
    acceptor: TlsAcceptor,
    registry: Arc<HandlerRegistry>,
) {
    let tls_stream = match acceptor.accept(stream).await {
        Ok(stream) => stream,
        Err(err) => {
            logger::log_handshake_failed(&peer_addr, &err);
            return;
        }
    };

    let authorized = tls_stream.get_ref().1.peer_certificates().is_some();
    if !authorized {
        logger::log_missing_credential(&peer_addr);
    }

    let io = TokioIo::new(tls_stream);
    let mut builder = http1::Builder::new();
    if !authorized {
        builder.keep_alive(false);
    }

    let conn = builder.serve_connection(
        io,
        service_fn(move |req| {
            let registry = Arc::clone(&registry);
            async move {
                if authorized {
                    handle_request(req, registry).await
                } else {
                    Ok(http::build_unauthorized_response())
                }
            }
        }),
    );

    if let Err(err) = conn.await {
        logger::log_connection_error(&err);
    }
}

/// Resolve the request path and invoke the matched handler
async fn handle_request(
    req: Request<Incoming>,
    registry: Arc<HandlerRegistry>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let ctx = RequestContext::new(req.uri());
    let handler = registry.resolve(ctx.path());
    Ok(handler.handle(ctx).await)
}
