//! When to refresh a cached GSTIN status.

use chrono::{NaiveDate, NaiveDateTime};

use crate::core::{GstSettings, GstinRecord};

/// Outcome of the refresh policy, with the reason it was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshDecision {
    /// Status validation or the APIs are switched off, or sandbox mode is on.
    Disabled,
    /// The GSTIN was looked up moments ago.
    RecentlyChecked,
    /// No record exists yet.
    FirstLookup,
    /// Not called for a transaction; the cached record is good enough.
    NotForTransaction,
    /// Status other than Active/Cancelled is re-checked on every transaction.
    UnsettledStatus,
    /// The record is older than the refresh interval.
    Stale { days: i64 },
    /// The record is within the refresh interval.
    Fresh { days: i64 },
}

impl RefreshDecision {
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            Self::FirstLookup | Self::UnsettledStatus | Self::Stale { .. }
        )
    }
}

/// Decide whether `existing` should be refreshed from the network.
///
/// # Logic
///
/// 1. Validation disabled, APIs disabled, sandbox mode, or recently checked → no
/// 2. No record yet → yes
/// 3. No transaction date → no
/// 4. Status outside Active/Cancelled → yes
/// 5. Days since `last_updated_on` ≥ `gstin_status_refresh_interval` → yes
pub fn refresh_decision(
    settings: &GstSettings,
    existing: Option<&GstinRecord>,
    transaction_date: Option<NaiveDate>,
    recently_checked: bool,
    now: NaiveDateTime,
) -> RefreshDecision {
    if !settings.validate_gstin_status || !settings.is_api_enabled() || settings.sandbox_mode {
        return RefreshDecision::Disabled;
    }

    if recently_checked {
        return RefreshDecision::RecentlyChecked;
    }

    let Some(record) = existing else {
        return RefreshDecision::FirstLookup;
    };

    if transaction_date.is_none() {
        return RefreshDecision::NotForTransaction;
    }

    if !record.status.is_some_and(|s| s.is_settled()) {
        return RefreshDecision::UnsettledStatus;
    }

    let days = (now.date() - record.last_updated_on.date()).num_days();
    if days >= settings.gstin_status_refresh_interval {
        RefreshDecision::Stale { days }
    } else {
        RefreshDecision::Fresh { days }
    }
}

/// Whether `existing` should be refreshed from the network.
pub fn is_status_refresh_required(
    settings: &GstSettings,
    existing: Option<&GstinRecord>,
    transaction_date: Option<NaiveDate>,
    recently_checked: bool,
    now: NaiveDateTime,
) -> bool {
    refresh_decision(settings, existing, transaction_date, recently_checked, now).is_required()
}
