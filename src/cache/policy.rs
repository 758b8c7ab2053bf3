use std::time::Duration;

use crate::error::{Error, Result};
use crate::utils::constants::{
    BACKGROUND_REFRESH_INTERVAL, DEFAULT_FETCH_TIMEOUT, GRACE_MARGIN, IAM_TOKEN_LIFETIME,
    REFRESH_MARGIN,
};

/// Timing rules for one token cache.
///
/// Ages are measured from the last fetch attempt that was recorded in the
/// cache. Suppressed failures are not recorded, so during a grace period the
/// age keeps growing from the last real fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// A held token younger than this is returned without contacting the source.
    pub refresh_after: Duration,
    /// A failed refresh is hidden from callers while the held token is younger than this.
    pub grace_period: Duration,
    /// Tick period of the background refresher.
    pub background_interval: Duration,
    /// Upper bound on a single call to the credential source.
    pub fetch_timeout: Option<Duration>,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self::for_lifetime(IAM_TOKEN_LIFETIME)
    }
}

impl RefreshPolicy {
    /// Derive both margins from the nominal token lifetime: refresh four hours
    /// before expiry, surface failures ten minutes before expiry.
    ///
    /// Short lifetimes use proportional margins instead: refresh after two
    /// thirds of the lifetime, surface failures after five sixths.
    pub fn for_lifetime(lifetime: Duration) -> Self {
        Self {
            refresh_after: lifetime.saturating_sub(REFRESH_MARGIN).max(lifetime / 3 * 2),
            grace_period: lifetime.saturating_sub(GRACE_MARGIN).max(lifetime / 6 * 5),
            background_interval: BACKGROUND_REFRESH_INTERVAL,
            fetch_timeout: Some(DEFAULT_FETCH_TIMEOUT),
        }
    }

    pub fn with_refresh_after(mut self, refresh_after: Duration) -> Self {
        self.refresh_after = refresh_after;
        self
    }

    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    pub fn with_background_interval(mut self, interval: Duration) -> Self {
        self.background_interval = interval;
        self
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Option<Duration>) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn is_fresh(&self, age: Duration) -> bool {
        age < self.refresh_after
    }

    pub fn within_grace(&self, age: Duration) -> bool {
        age < self.grace_period
    }

    pub fn validate(&self) -> Result<()> {
        if self.refresh_after.is_zero() {
            return Err(Error::Config("refresh-after must be positive".to_owned()));
        }
        if self.grace_period.is_zero() {
            return Err(Error::Config("grace period must be positive".to_owned()));
        }
        if self.background_interval.is_zero() {
            return Err(Error::Config("background refresh interval must be positive".to_owned()));
        }
        if self.grace_period < self.refresh_after {
            return Err(Error::Config(format!(
                "grace period {:?} is shorter than refresh-after {:?}",
                self.grace_period, self.refresh_after
            )));
        }
        if self.fetch_timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::Config("fetch timeout must be positive".to_owned()));
        }
        Ok(())
    }
}
