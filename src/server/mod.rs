// Server module entry point
// Owns the listener lifecycle: bind the prefixes, launch the accept loops,
// stop, and dispose.

mod connection;
mod listener;
mod tls;

// Rust does not allow `loop` as a module name (keyword), so the accept-loop
// module is declared with an explicit path
#[path = "loop.rs"]
mod server_loop;

pub mod signal;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_rustls::TlsAcceptor;

use crate::config::{Config, ListenPrefix, Scheme};
use crate::error::StartupError;
use crate::handler::Handler;
use crate::logger;
use crate::registry::HandlerRegistry;

/// HTTP server owning the dispatch registry and the accept-loop tasks.
///
/// `start` binds the configured prefixes, launches one accept loop per
/// prefix, and returns immediately. `stop` unblocks the loops and releases
/// the bindings; a stopped server may be started again. `dispose` is the
/// idempotent teardown: it stops if needed and waits for the loops to
/// finish. In-flight connections are never cancelled; they run to
/// completion on their own tasks.
pub struct HttpServer {
    config: Config,
    registry: Arc<HandlerRegistry>,
    shutdown: Option<watch::Sender<bool>>,
    accept_tasks: Vec<JoinHandle<()>>,
    bound_addrs: Vec<SocketAddr>,
    disposed: bool,
}

impl HttpServer {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            registry: Arc::new(HandlerRegistry::new()),
            shutdown: None,
            accept_tasks: Vec::new(),
            bound_addrs: Vec::new(),
            disposed: false,
        }
    }

    /// Add a route handler; safe before or after `start`
    pub fn register(&self, handler: Arc<dyn Handler>) {
        self.registry.register(handler);
    }

    /// Whether the accept loops are currently running
    pub fn is_listening(&self) -> bool {
        self.shutdown.is_some()
    }

    /// Addresses actually bound by the last `start`, in prefix order.
    /// Useful when a prefix requested port 0.
    pub fn bound_addrs(&self) -> &[SocketAddr] {
        &self.bound_addrs
    }

    /// Parse and bind every configured prefix, then launch one accept-loop
    /// task per prefix. Returns once the loops are launched; must be called
    /// from within the tokio runtime. No-op when already listening or
    /// disposed.
    pub fn start(&mut self) -> Result<(), StartupError> {
        if self.disposed || self.is_listening() {
            return Ok(());
        }

        let prefixes = self.config.listen_prefixes()?;
        let acceptor = self.build_tls_acceptor(&prefixes)?;

        // Bind everything before launching any loop, so a bad prefix
        // leaves no half-started server behind
        let mut bound = Vec::with_capacity(prefixes.len());
        for prefix in &prefixes {
            let tcp_listener = listener::bind_prefix(prefix)?;
            let local_addr = tcp_listener
                .local_addr()
                .map_err(|source| StartupError::Bind {
                    addr: prefix.addr,
                    source,
                })?;
            bound.push((tcp_listener, local_addr, prefix.scheme));
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let access_log = self.config.logging.access_log;

        self.bound_addrs.clear();
        for (tcp_listener, local_addr, scheme) in bound {
            logger::log_server_start(&scheme.to_string(), &local_addr);

            let tls = match scheme {
                Scheme::Https => acceptor.clone(),
                Scheme::Http => None,
            };
            let task = tokio::spawn(server_loop::run_accept_loop(
                tcp_listener,
                local_addr,
                tls,
                Arc::clone(&self.registry),
                shutdown_rx.clone(),
                access_log,
            ));

            self.accept_tasks.push(task);
            self.bound_addrs.push(local_addr);
        }

        self.shutdown = Some(shutdown_tx);
        Ok(())
    }

    fn build_tls_acceptor(
        &self,
        prefixes: &[ListenPrefix],
    ) -> Result<Option<TlsAcceptor>, StartupError> {
        if !prefixes.iter().any(|p| p.scheme == Scheme::Https) {
            return Ok(None);
        }

        let tls = self.config.tls.as_ref().ok_or_else(|| {
            StartupError::TlsConfig(
                "an https prefix is configured but the [tls] section is missing".to_string(),
            )
        })?;

        tls::build_acceptor(tls).map(Some)
    }

    /// Signal the accept loops to exit and release their bindings.
    /// No-op when not listening. In-flight connections keep running.
    pub fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(true);
        }
    }

    /// Idempotent teardown: stop if running and wait for the accept loops
    /// to finish. Effect only on the first call.
    pub async fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.stop();

        for task in self.accept_tasks.drain(..) {
            if let Err(err) = task.await {
                logger::log_error(&format!("Accept loop task failed: {err}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LoggingConfig, ServerConfig};
    use crate::handler::{MorningHandler, RequestContext};
    use async_trait::async_trait;
    use http_body_util::Full;
    use hyper::body::Bytes;
    use hyper::Response;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    fn test_config(prefixes: Vec<&str>) -> Config {
        Config {
            server: ServerConfig {
                prefixes: prefixes.into_iter().map(String::from).collect(),
                workers: None,
            },
            logging: LoggingConfig { access_log: false },
            tls: None,
        }
    }

    async fn http_get(addr: SocketAddr, target: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request =
            format!("GET {target} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        String::from_utf8(response).unwrap()
    }

    struct SlowHandler;

    #[async_trait]
    impl crate::handler::Handler for SlowHandler {
        fn name(&self) -> &'static str {
            "/Slow"
        }

        async fn handle(&self, _ctx: RequestContext) -> Response<Full<Bytes>> {
            tokio::time::sleep(Duration::from_secs(2)).await;
            crate::http::build_text_response("slow done".to_string())
        }
    }

    #[tokio::test]
    async fn test_dispatch_to_registered_route() {
        let mut server = HttpServer::new(test_config(vec!["http://127.0.0.1:0/"]));
        server.register(Arc::new(MorningHandler));
        server.start().unwrap();
        let addr = server.bound_addrs()[0];

        let response = http_get(addr, "/Morning?name=Ada").await;
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.ends_with("Good morning Ada!"));

        let response = http_get(addr, "/Morning").await;
        assert!(response.ends_with("Good morning stranger!"));

        server.dispose().await;
    }

    #[tokio::test]
    async fn test_unregistered_path_gets_not_found() {
        let mut server = HttpServer::new(test_config(vec!["http://127.0.0.1:0/"]));
        server.register(Arc::new(MorningHandler));
        server.start().unwrap();
        let addr = server.bound_addrs()[0];

        let response = http_get(addr, "/Nope").await;
        assert!(response.starts_with("HTTP/1.1 404"));
        assert!(response.ends_with("Could not find resource."));

        server.dispose().await;
    }

    #[tokio::test]
    async fn test_stop_then_start_accepts_again() {
        let mut server = HttpServer::new(test_config(vec!["http://127.0.0.1:0/"]));
        server.register(Arc::new(MorningHandler));
        server.start().unwrap();
        let first_addr = server.bound_addrs()[0];
        assert!(http_get(first_addr, "/Morning").await.starts_with("HTTP/1.1 200"));

        server.stop();
        // Second stop is a no-op
        server.stop();
        assert!(!server.is_listening());

        server.start().unwrap();
        let second_addr = server.bound_addrs()[0];
        let response = http_get(second_addr, "/Morning?name=Ada").await;
        assert!(response.ends_with("Good morning Ada!"));

        server.dispose().await;
    }

    #[tokio::test]
    async fn test_slow_handler_does_not_delay_fast_handler() {
        let mut server = HttpServer::new(test_config(vec!["http://127.0.0.1:0/"]));
        server.register(Arc::new(SlowHandler));
        server.register(Arc::new(MorningHandler));
        server.start().unwrap();
        let addr = server.bound_addrs()[0];

        // Open the slow request first and leave it in flight
        let mut slow = TcpStream::connect(addr).await.unwrap();
        slow.write_all(b"GET /Slow HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        // The fast request must complete while the slow handler sleeps
        let fast = tokio::time::timeout(Duration::from_secs(1), http_get(addr, "/Morning"))
            .await
            .expect("fast request was delayed by the slow handler");
        assert!(fast.ends_with("Good morning stranger!"));

        let mut response = Vec::new();
        slow.read_to_end(&mut response).await.unwrap();
        assert!(String::from_utf8(response).unwrap().ends_with("slow done"));

        server.dispose().await;
    }

    #[tokio::test]
    async fn test_register_after_start() {
        let mut server = HttpServer::new(test_config(vec!["http://127.0.0.1:0/"]));
        server.start().unwrap();
        let addr = server.bound_addrs()[0];

        assert!(http_get(addr, "/Morning").await.starts_with("HTTP/1.1 404"));

        server.register(Arc::new(MorningHandler));
        assert!(http_get(addr, "/Morning").await.starts_with("HTTP/1.1 200"));

        server.dispose().await;
    }

    #[tokio::test]
    async fn test_multiple_prefixes_accept_independently() {
        let mut server = HttpServer::new(test_config(vec![
            "http://127.0.0.1:0/",
            "http://127.0.0.1:0/",
        ]));
        server.register(Arc::new(MorningHandler));
        server.start().unwrap();

        let addrs = server.bound_addrs().to_vec();
        assert_eq!(addrs.len(), 2);
        for addr in addrs {
            assert!(http_get(addr, "/Morning").await.starts_with("HTTP/1.1 200"));
        }

        server.dispose().await;
    }

    #[tokio::test]
    async fn test_dispose_is_idempotent() {
        let mut server = HttpServer::new(test_config(vec!["http://127.0.0.1:0/"]));
        server.start().unwrap();

        server.dispose().await;
        server.dispose().await;
        assert!(!server.is_listening());

        // A disposed server stays down
        server.start().unwrap();
        assert!(!server.is_listening());
    }

    #[tokio::test]
    async fn test_start_rejects_invalid_prefix() {
        let mut server = HttpServer::new(test_config(vec!["ftp://127.0.0.1:21/"]));
        let err = server.start().unwrap_err();
        assert!(matches!(err, StartupError::InvalidPrefix { .. }));
        assert!(!server.is_listening());
    }

    #[tokio::test]
    async fn test_https_prefix_requires_tls_section() {
        let mut server = HttpServer::new(test_config(vec!["https://127.0.0.1:0/"]));
        let err = server.start().unwrap_err();
        assert!(matches!(err, StartupError::TlsConfig(_)));
    }
}
