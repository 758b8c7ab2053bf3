use std::sync::Arc;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cache::token_cache::Inner;

/// Refresh once immediately, then on every tick until `cancel` fires.
/// Fetch errors never stop the loop; they land in the cache state.
pub(crate) fn spawn(inner: Arc<Inner>, cancel: CancellationToken) {
    let period = inner.policy.background_interval;
    tokio::spawn(async move {
        if cancel.is_cancelled() {
            return;
        }
        info!(source = inner.source_name(), "background token refresh started, period {:?}", period);
        inner.refresh().await;

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = ticker.tick() => inner.refresh().await,
            }
        }
        info!(source = inner.source_name(), "background token refresh stopped");
    });
}
