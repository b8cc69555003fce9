//! SkyChain fleet-maintenance HTTP service

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use skychain_core::{logging, Config, SystemClock};
use skychain_fleet::FleetService;
use skychain_store::Store;
use tokio::net::TcpListener;
use tracing::info;

mod error;
mod handlers;
mod state;
mod sweep;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;
    logging::init(&config.logging).context("installing log subscriber")?;

    let store = open_store(&config)?;
    let service = FleetService::from_config(&config, Arc::new(store), Arc::new(SystemClock));
    let state = Arc::new(AppState::new(service, config.clone()));

    if let Some(report) = sweep::sweep_once(&state.service).await {
        info!(?report, "Startup status sweep complete");
    }
    let sweeper = match config.maintenance.status_sweep_secs {
        0 => None,
        secs => Some(sweep::spawn(Arc::clone(&state.service), Duration::from_secs(secs))),
    };

    let app = handlers::router(state);
    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    info!(
        addr = %bind_addr,
        environment = ?config.server.environment,
        "SkyChain API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .context("serving HTTP")?;

    if let Some(handle) = sweeper {
        handle.abort();
    }
    info!("SkyChain API stopped");
    Ok(())
}

fn open_store(config: &Config) -> anyhow::Result<Store> {
    let path = &config.storage.database_path;
    let store = if path.as_os_str() == ":memory:" {
        Store::open_in_memory()
    } else {
        Store::open(path)
    };
    store.with_context(|| format!("opening store at {}", path.display()))
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("Shutdown signal received");
}
