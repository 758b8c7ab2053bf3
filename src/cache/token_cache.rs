use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{timeout, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::cache::policy::RefreshPolicy;
use crate::cache::refresher;
use crate::error::{Error, Result};
use crate::observability::metrics::get_metrics;
use crate::sources::TokenSource;

/// Externally observable condition of a token cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// No fetch has been attempted yet.
    Empty,
    /// A token is held and the last fetch succeeded.
    Valid,
    /// The last fetch failed but the held token is still served.
    StaleGrace,
    /// The last recorded fetch failed and no token is held.
    Failed,
}

#[derive(Debug, Clone)]
pub struct TokenSnapshot {
    pub state: CacheState,
    pub last_fetch: Option<Instant>,
    pub last_error: Option<Error>,
}

/// Token, last error and last fetch time, always updated together.
#[derive(Debug, Default)]
struct TokenState {
    token: String,
    error: Option<Error>,
    fetched_at: Option<Instant>,
    suppressed: bool,
}

impl TokenState {
    fn age(&self, now: Instant) -> Option<std::time::Duration> {
        self.fetched_at.map(|at| now.saturating_duration_since(at))
    }
}

pub(crate) struct Inner {
    source: Arc<dyn TokenSource>,
    pub(crate) policy: RefreshPolicy,
    state: Mutex<TokenState>,
}

impl Inner {
    pub(crate) fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Refresh from the background task, taking the lock first.
    pub(crate) async fn refresh(&self) {
        let mut state = self.state.lock().await;
        self.refresh_locked(&mut state).await;
    }

    async fn refresh_locked(&self, state: &mut TokenState) {
        let name = self.source.name();
        if !state.token.is_empty()
            && state.age(Instant::now()).is_some_and(|age| self.policy.is_fresh(age))
        {
            debug!(source = name, "cached token is fresh");
            return;
        }

        let result = self.fetch().await;
        let now = Instant::now();
        match result {
            Ok(token) => {
                info!(source = name, "token refreshed");
                state.token = token;
                state.error = None;
                state.fetched_at = Some(now);
                state.suppressed = false;
            }
            Err(err)
                if !state.token.is_empty()
                    && state.age(now).is_some_and(|age| self.policy.within_grace(age)) =>
            {
                warn!(source = name, "token refresh failed, serving cached token: {}", err);
                get_metrics().await.token_fetch_suppressed.with_label_values(&[name]).inc();
                state.suppressed = true;
            }
            Err(err) => {
                error!(source = name, "token refresh failed: {}", err);
                state.token.clear();
                state.error = Some(err);
                state.fetched_at = Some(now);
                state.suppressed = false;
            }
        }
    }

    async fn fetch(&self) -> Result<String> {
        let name = self.source.name();
        let metrics = get_metrics().await;
        metrics.token_fetch_requests.with_label_values(&[name]).inc();
        let start = Instant::now();

        let result = match self.policy.fetch_timeout {
            Some(limit) => timeout(limit, self.source.obtain_token())
                .await
                .unwrap_or(Err(Error::Timeout(limit))),
            None => self.source.obtain_token().await,
        }
        .and_then(|token| {
            if token.is_empty() {
                Err(Error::Decode(format!("source '{name}' returned an empty token")))
            } else {
                Ok(token)
            }
        });

        metrics
            .token_fetch_duration
            .with_label_values(&[name])
            .observe(start.elapsed().as_secs_f64());
        if result.is_err() {
            metrics.token_fetch_failures.with_label_values(&[name]).inc();
        }
        result
    }
}

/// Single-slot cache of a bearer token obtained from one credential source.
///
/// Clones share the same state. All reads and refreshes go through one
/// exclusive lock, so concurrent callers never trigger duplicate fetches.
#[derive(Clone)]
pub struct TokenCache {
    inner: Arc<Inner>,
    cancel: Option<CancellationToken>,
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("source", &self.inner.source.name())
            .field("policy", &self.inner.policy)
            .field("background_refresh", &self.background_refresh_active())
            .finish()
    }
}

impl TokenCache {
    /// Cache that refreshes only when a caller asks for a token.
    pub fn new<S>(source: S, policy: RefreshPolicy) -> Self
    where
        S: TokenSource + 'static,
    {
        Self::from_shared(Arc::new(source), policy)
    }

    pub fn from_shared(source: Arc<dyn TokenSource>, policy: RefreshPolicy) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                policy,
                state: Mutex::new(TokenState::default()),
            }),
            cancel: None,
        }
    }

    /// Cache that also refreshes itself every `policy.background_interval`
    /// until `cancel` fires. Must be called inside a Tokio runtime.
    ///
    /// The background task keeps the cache alive. Dropping every handle
    /// without cancelling leaves the task running for the life of the runtime.
    pub fn with_background_refresh<S>(source: S, policy: RefreshPolicy, cancel: CancellationToken) -> Self
    where
        S: TokenSource + 'static,
    {
        let mut cache = Self::new(source, policy);
        refresher::spawn(Arc::clone(&cache.inner), cancel.clone());
        cache.cancel = Some(cancel);
        cache
    }

    /// Return a usable token, refreshing it first if it is missing or due.
    ///
    /// The lock is held across the fetch, so other callers wait for the
    /// in-flight refresh instead of starting their own.
    pub async fn get_token(&self) -> Result<String> {
        let mut state = self.inner.state.lock().await;
        self.inner.refresh_locked(&mut state).await;
        match &state.error {
            Some(err) => Err(err.clone()),
            None => Ok(state.token.clone()),
        }
    }

    pub async fn snapshot(&self) -> TokenSnapshot {
        let state = self.inner.state.lock().await;
        let cache_state = match (state.token.is_empty(), state.error.is_some()) {
            (true, true) => CacheState::Failed,
            (true, false) => CacheState::Empty,
            (false, _) if state.suppressed => CacheState::StaleGrace,
            (false, _) => CacheState::Valid,
        };
        TokenSnapshot {
            state: cache_state,
            last_fetch: state.fetched_at,
            last_error: state.error.clone(),
        }
    }

    pub fn policy(&self) -> &RefreshPolicy {
        &self.inner.policy
    }

    pub fn background_refresh_active(&self) -> bool {
        self.cancel.as_ref().is_some_and(|c| !c.is_cancelled())
    }

    /// Stop the background refresher. Returns `false` when none was started.
    pub fn cancel_background_refresh(&self) -> bool {
        match &self.cancel {
            Some(cancel) => {
                cancel.cancel();
                true
            }
            None => false,
        }
    }
}
