// Signal handling module
//
// SIGTERM and SIGINT end the process; the host stops and disposes the
// server once this returns.

use crate::logger;

/// Wait until the process is asked to shut down (Unix)
#[cfg(unix)]
pub async fn wait_for_shutdown() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm =
        signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
    let mut sigint =
        signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

    tokio::select! {
        _ = sigterm.recv() => logger::log_signal("SIGTERM"),
        _ = sigint.recv() => logger::log_signal("SIGINT"),
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn wait_for_shutdown() {
    if let Ok(()) = tokio::signal::ctrl_c().await {
        logger::log_signal("Ctrl+C");
    }
}
