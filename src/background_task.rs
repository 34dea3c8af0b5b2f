use std::sync::Arc;

use tokio::time::interval;

use crate::{constants::MAINTENANCE_INTERVAL, github::oauth::OAuthStateStore, realtime::hub::RealtimeHub};

/// Sweeps realtime channels without subscribers and OAuth states that
/// expired before their callback arrived.
pub async fn start_maintenance_task(hub: Arc<RealtimeHub>, oauth_states: Arc<OAuthStateStore>) {
    let mut interval = interval(MAINTENANCE_INTERVAL);

    loop {
        interval.tick().await;
        run_maintenance(&hub, &oauth_states);
    }
}

pub fn run_maintenance(hub: &RealtimeHub, oauth_states: &OAuthStateStore) -> (usize, usize) {
    let channels = hub.prune_idle();
    let states = oauth_states.prune_expired();

    if channels > 0 || states > 0 {
        tracing::info!(channels, states, "Pruned idle realtime channels and expired OAuth states");
    }
    (channels, states)
}
