use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use image_relay::{bootstrap, config, logger, server};

/// Config file used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(config::AppState::new(cfg)?);

    let bootstrap_state = Arc::clone(&state);
    tokio::spawn(async move {
        let config = &bootstrap_state.config;
        if let Err(e) = bootstrap::ensure_assets(&config.bootstrap, &config.static_files.root).await {
            logger::log_warning(&format!("[Bootstrap] Skipped: {e}"));
        }
    });

    let active_connections = Arc::new(AtomicUsize::new(0));
    server::run_server_loop(
        listener,
        state,
        active_connections,
        server::shutdown_signal(),
    )
    .await;

    logger::log_info("Server stopped");
    Ok(())
}
