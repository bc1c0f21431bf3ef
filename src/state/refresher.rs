use crate::state::messages::NetworkRequest;
use log::debug;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Re-fetches the league snapshot on a fixed interval so new results show up
/// without a manual refresh.
pub struct PeriodicRefresher {
    network_requests: mpsc::Sender<NetworkRequest>,
    every: Duration,
}

impl PeriodicRefresher {
    pub fn new(network_requests: mpsc::Sender<NetworkRequest>, every: Duration) -> Self {
        Self { network_requests, every }
    }

    pub async fn run(self) {
        if self.every.is_zero() {
            debug!("periodic refresh disabled");
            return;
        }

        let mut league_interval = interval(self.every);
        // Skip the immediate first tick so startup loading isn't double-triggered.
        league_interval.tick().await;

        loop {
            league_interval.tick().await;
            if self
                .network_requests
                .send(NetworkRequest::RefreshLeague)
                .await
                .is_err()
            {
                break;
            }
        }
    }
}
