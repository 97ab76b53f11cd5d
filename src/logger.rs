//! Logger module
//!
//! Console logging for server lifecycle and dispatch events. Informational
//! output goes to stdout, errors to stderr, both with a local timestamp.

use chrono::Local;
use std::net::SocketAddr;

fn write_info(message: &str) {
    println!("[{}] {message}", Local::now().format("%Y-%m-%d %H:%M:%S"));
}

fn write_error(message: &str) {
    eprintln!("[{}] {message}", Local::now().format("%Y-%m-%d %H:%M:%S"));
}

pub fn log_server_start(scheme: &str, addr: &SocketAddr) {
    write_info(&format!("Listening on: {scheme}://{addr}"));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_accept_error(err: &std::io::Error) {
    write_error(&format!("[ERROR] Failed to accept connection: {err}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

/// Logged when an accept loop exits because the server was stopped.
/// Expected during shutdown, so this is informational.
pub fn log_listener_shutdown(addr: &SocketAddr) {
    write_info(&format!("[Shutdown] Listener on {addr} was shut down"));
}

/// Logged by the fallback handler with the path and query as received
pub fn log_unresolved_route(raw_uri: &str) {
    write_info(&format!(
        "Invalid request from client. Request string: {raw_uri}"
    ));
}

pub fn log_handshake_failed(peer_addr: &SocketAddr, err: &std::io::Error) {
    write_error(&format!(
        "[TLS] Handshake with {peer_addr} failed: {err}"
    ));
}

pub fn log_missing_credential(peer_addr: &SocketAddr) {
    write_info(&format!(
        "[TLS] No client certificate presented by {peer_addr}, responding 401"
    ));
}

pub fn log_signal(name: &str) {
    write_info(&format!("[Signal] Received {name}, shutting down"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}
