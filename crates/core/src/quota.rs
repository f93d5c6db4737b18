//! Daily request quota for the global catalog.
//!
//! Counts live in the settings store under `requests_<YYYY-MM-DD>` (local
//! date). Old days are never cleaned up; a new date simply starts at zero.

use std::sync::Arc;

use chrono::Local;
use tracing::warn;

use crate::settings::{SettingsError, SettingsStore};

/// Default daily cap, kept below the provider's 1000/day allowance.
pub const DEFAULT_DAILY_LIMIT: i64 = 900;

/// Per-day request counter backed by a settings store.
pub struct DailyQuotaTracker {
    settings: Arc<dyn SettingsStore>,
    daily_limit: i64,
}

impl DailyQuotaTracker {
    pub fn new(settings: Arc<dyn SettingsStore>, daily_limit: i64) -> Self {
        Self {
            settings,
            daily_limit,
        }
    }

    /// Today's local date as `YYYY-MM-DD`.
    pub fn today() -> String {
        Local::now().format("%Y-%m-%d").to_string()
    }

    /// Settings key holding the count for `date`.
    pub fn key_for(date: &str) -> String {
        format!("requests_{}", date)
    }

    pub fn daily_limit(&self) -> i64 {
        self.daily_limit
    }

    /// Requests recorded so far today.
    pub fn used_today(&self) -> Result<i64, SettingsError> {
        self.used_on(&Self::today())
    }

    /// Requests recorded on a given date.
    pub fn used_on(&self, date: &str) -> Result<i64, SettingsError> {
        Ok(self.settings.get_int(&Self::key_for(date))?.unwrap_or(0))
    }

    /// Whether another request fits in today's quota.
    pub fn can_make_request(&self) -> Result<bool, SettingsError> {
        Ok(self.used_today()? < self.daily_limit)
    }

    /// Count one successful request against today's quota.
    pub fn record_request(&self) -> Result<(), SettingsError> {
        self.settings.increment(&Self::key_for(&Self::today()))?;
        Ok(())
    }

    /// Claim one request from today's quota before sending it.
    ///
    /// The check and the increment are a single store operation, so concurrent
    /// callers can never claim more than the limit between them. Returns `None`
    /// when the quota is used up. The claim is given back when the returned
    /// reservation is dropped without [`QuotaReservation::commit`].
    pub fn try_reserve(&self) -> Result<Option<QuotaReservation<'_>>, SettingsError> {
        let key = Self::key_for(&Self::today());
        Ok(self
            .settings
            .increment_below(&key, self.daily_limit)?
            .map(|_| QuotaReservation {
                tracker: self,
                key,
                committed: false,
            }))
    }

    /// Requests left today, never negative.
    pub fn remaining_requests(&self) -> Result<i64, SettingsError> {
        self.remaining_on(&Self::today())
    }

    /// Requests left on a given date, never negative.
    pub fn remaining_on(&self, date: &str) -> Result<i64, SettingsError> {
        Ok((self.daily_limit - self.used_on(date)?).max(0))
    }
}

/// One request claimed from the daily quota.
///
/// Dropping it uncommitted releases the claim, which covers failed requests
/// as well as cancelled or panicking searches.
#[must_use = "an uncommitted reservation is released on drop"]
pub struct QuotaReservation<'a> {
    tracker: &'a DailyQuotaTracker,
    key: String,
    committed: bool,
}

impl QuotaReservation<'_> {
    /// Keep the claim: the request went through.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for QuotaReservation<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Err(e) = self.tracker.settings.decrement(&self.key) {
            warn!(key = %self.key, error = %e, "Failed to release quota reservation");
        }
    }
}
