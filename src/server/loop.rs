// Accept loop module
// One loop per bound prefix: wait for a connection or the shutdown signal

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_rustls::TlsAcceptor;

use super::connection::dispatch_connection;
use crate::logger;
use crate::registry::HandlerRegistry;

/// Run the accept loop for one bound prefix until shutdown is signalled.
///
/// Accept errors are logged and the loop keeps going; only the shutdown
/// signal ends it. The listener is dropped on exit, which releases the
/// binding. Connections already dispatched keep running on their own
/// tasks.
pub async fn run_accept_loop(
    listener: TcpListener,
    addr: SocketAddr,
    tls: Option<TlsAcceptor>,
    registry: Arc<HandlerRegistry>,
    mut shutdown: watch::Receiver<bool>,
    access_log: bool,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        dispatch_connection(
                            stream,
                            peer_addr,
                            tls.clone(),
                            Arc::clone(&registry),
                            access_log,
                        );
                    }
                    Err(e) => {
                        logger::log_accept_error(&e);
                    }
                }
            }

            // Fires on stop() and also if the server itself is dropped
            _ = shutdown.changed() => {
                logger::log_listener_shutdown(&addr);
                break;
            }
        }
    }
}
