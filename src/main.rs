use std::sync::Arc;

mod config;
mod error;
mod handler;
mod http;
mod logger;
mod registry;
mod server;

use handler::{AfternoonHandler, MorningHandler};
use server::HttpServer;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut server = HttpServer::new(cfg);

    server.register(Arc::new(MorningHandler));
    server.register(Arc::new(AfternoonHandler));

    server.start()?;

    // Run until the process is asked to shut down
    server::signal::wait_for_shutdown().await;

    server.stop();
    server.dispose().await;

    Ok(())
}
