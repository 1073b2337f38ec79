//! Periodic ticket housekeeping. One sweep runs immediately at startup
//! (the interval's first tick fires at once), then on the configured
//! interval for the life of the process. Errors are logged and the loop
//! keeps going; a sweep with nothing to delete is a no-op.

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::database::tickets;
use crate::state::AppState;

pub fn spawn(state: AppState) -> JoinHandle<()> {
    tokio::spawn(run(state))
}

async fn run(state: AppState) {
    // interval(0) panics; clamp in case of a zeroed override
    let secs = state.config.cleanup.interval_secs.max(1);
    let mut interval = tokio::time::interval(Duration::from_secs(secs));

    loop {
        interval.tick().await;

        match tickets::purge_expired(&state.db).await {
            Ok(0) => tracing::debug!("cleanup sweep: nothing to remove"),
            Ok(removed) => tracing::info!(removed, "cleanup sweep removed expired tickets"),
            Err(e) => tracing::error!("cleanup sweep failed: {}", e),
        }
    }
}
