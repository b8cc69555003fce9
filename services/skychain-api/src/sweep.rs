//! Background status reconciliation

use std::sync::Arc;
use std::time::Duration;

use skychain_fleet::{FleetService, SweepReport};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{info, warn};

/// Run one sweep on the blocking pool
pub async fn sweep_once(service: &Arc<FleetService>) -> Option<SweepReport> {
    let service = Arc::clone(service);
    match tokio::task::spawn_blocking(move || service.sweep_statuses()).await {
        Ok(Ok(report)) => Some(report),
        Ok(Err(err)) => {
            warn!(error = %err, "Status sweep failed");
            None
        }
        Err(err) => {
            warn!(error = %err, "Status sweep task panicked");
            None
        }
    }
}

/// Sweep every `every`, starting one period from now
pub fn spawn(service: Arc<FleetService>, every: Duration) -> JoinHandle<()> {
    info!(interval_secs = every.as_secs(), "Status sweep scheduled");
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            sweep_once(&service).await;
        }
    })
}
