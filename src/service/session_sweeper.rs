use chrono::Utc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::db::SessionsStorage;

/// Periodically delete expired sessions. Lookups already ignore them; this keeps the table small.
pub fn spawn(storage: SessionsStorage, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match storage.purge_expired(Utc::now()).await {
                Ok(0) => debug!("no expired sessions to purge"),
                Ok(n) => info!(count = n, "purged expired sessions"),
                Err(e) => warn!(error = %e, "failed to purge expired sessions"),
            }
        }
    })
}
