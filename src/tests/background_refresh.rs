// Background refresher: initial refresh, periodic ticks, resilience to fetch
// errors and cancellation. Runs on Tokio's paused clock.

use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::cache::{CacheState, RefreshPolicy, TokenCache};
use crate::tests::common::{unavailable, ScriptedSource};

const HOUR: Duration = Duration::from_secs(3600);
const MINUTE: Duration = Duration::from_secs(60);

fn background_cache(source: &ScriptedSource, cancel: &CancellationToken) -> TokenCache {
    TokenCache::with_background_refresh(source.clone(), RefreshPolicy::default(), cancel.clone())
}

#[tokio::test(start_paused = true)]
async fn refreshes_immediately_on_start() {
    let source = ScriptedSource::new("tok-1");
    let cancel = CancellationToken::new();
    let cache = background_cache(&source, &cancel);
    assert!(cache.background_refresh_active());

    sleep(Duration::from_millis(10)).await;
    assert_eq!(source.calls(), 1);
    assert_eq!(cache.snapshot().await.state, CacheState::Valid);

    // foreground read is a cache hit
    assert_eq!(cache.get_token().await.unwrap(), "tok-1");
    assert_eq!(source.calls(), 1);
    cancel.cancel();
}

#[tokio::test(start_paused = true)]
async fn ticks_only_fetch_when_token_is_due() {
    let source = ScriptedSource::new("tok-1");
    let cancel = CancellationToken::new();
    let cache = background_cache(&source, &cancel);

    sleep(30 * MINUTE + Duration::from_secs(30)).await;
    assert_eq!(source.calls(), 1);

    source.succeed_with("tok-2");
    sleep(8 * HOUR).await;
    assert_eq!(source.calls(), 2);
    assert_eq!(cache.get_token().await.unwrap(), "tok-2");
    assert_eq!(source.calls(), 2);
    cancel.cancel();
}

#[tokio::test(start_paused = true)]
async fn fetch_errors_do_not_stop_the_task() {
    let source = ScriptedSource::new("tok-1");
    let cancel = CancellationToken::new();
    let cache = background_cache(&source, &cancel);
    sleep(Duration::from_secs(30)).await;

    source.fail_with(unavailable());
    sleep(8 * HOUR + 10 * MINUTE).await;
    let failed_calls = source.calls();
    assert!(failed_calls > 2, "expected repeated attempts, got {failed_calls}");

    let snapshot = cache.snapshot().await;
    assert_eq!(snapshot.state, CacheState::StaleGrace);
    assert_eq!(cache.get_token().await.unwrap(), "tok-1");

    source.succeed_with("tok-2");
    sleep(MINUTE).await;
    assert_eq!(cache.snapshot().await.state, CacheState::Valid);
    assert_eq!(cache.get_token().await.unwrap(), "tok-2");
    cancel.cancel();
}

#[tokio::test(start_paused = true)]
async fn background_errors_surface_once_grace_has_passed() {
    let source = ScriptedSource::new("tok-1");
    let cancel = CancellationToken::new();
    let cache = background_cache(&source, &cancel);
    sleep(Duration::from_secs(30)).await;

    source.fail_with(unavailable());
    sleep(12 * HOUR).await;

    let snapshot = cache.snapshot().await;
    assert_eq!(snapshot.state, CacheState::Failed);
    assert_eq!(snapshot.last_error, Some(unavailable()));
    cancel.cancel();
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_refreshes_but_not_on_demand_fetches() {
    let source = ScriptedSource::new("tok-1");
    let cancel = CancellationToken::new();
    let cache = background_cache(&source, &cancel);
    sleep(Duration::from_secs(30)).await;
    assert_eq!(source.calls(), 1);

    assert!(cache.cancel_background_refresh());
    assert!(cancel.is_cancelled());
    assert!(!cache.background_refresh_active());

    source.succeed_with("tok-2");
    sleep(9 * HOUR).await;
    assert_eq!(source.calls(), 1);

    assert_eq!(cache.get_token().await.unwrap(), "tok-2");
    assert_eq!(source.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn already_cancelled_signal_never_fetches() {
    let source = ScriptedSource::new("tok-1");
    let cancel = CancellationToken::new();
    cancel.cancel();
    let cache = background_cache(&source, &cancel);

    sleep(HOUR).await;
    assert_eq!(source.calls(), 0);
    assert_eq!(cache.snapshot().await.state, CacheState::Empty);

    assert_eq!(cache.get_token().await.unwrap(), "tok-1");
    assert_eq!(source.calls(), 1);
}
