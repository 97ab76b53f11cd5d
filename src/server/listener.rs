// Listener binding module
// Creates TCP listeners for parsed prefixes

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

use crate::config::ListenPrefix;
use crate::error::StartupError;

/// Bind a `TcpListener` for a parsed prefix, mapping failures to the
/// startup error that names the address.
pub fn bind_prefix(prefix: &ListenPrefix) -> Result<TcpListener, StartupError> {
    create_reusable_listener(prefix.addr).map_err(|source| StartupError::Bind {
        addr: prefix.addr,
        source,
    })
}

/// Create a `TcpListener` with `SO_REUSEPORT` and `SO_REUSEADDR` enabled.
///
/// This lets a stopped server rebind the same prefix immediately instead of
/// waiting out sockets in `TIME_WAIT`.
fn create_reusable_listener(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    // Create socket with appropriate domain (IPv4 or IPv6)
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    socket.set_reuse_port(true)?;
    socket.set_reuse_address(true)?;

    // Set non-blocking mode for async compatibility
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;

    // Start listening with a backlog queue size of 128
    socket.listen(128)?;

    // Convert socket2::Socket to std::net::TcpListener, then to tokio::net::TcpListener
    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
