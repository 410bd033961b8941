//! Transaction deadlines.
//!
//! On the wire a deadline is a [`Uint64`] count of milliseconds since the
//! network epoch, not since the Unix epoch.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::uint64::Uint64;
use crate::config::{DEFAULT_DEADLINE_HOURS, MAX_DEADLINE_HOURS, NETWORK_EPOCH_MS};
use crate::error::TransactionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Deadline(Uint64);

impl Deadline {
    /// A deadline `hours` from now. The window must be in `(0, 24)` hours.
    pub fn create(hours: i64) -> Result<Self, TransactionError> {
        if hours <= 0 || hours >= MAX_DEADLINE_HOURS {
            return Err(TransactionError::InvalidDeadline(format!(
                "window of {hours}h must be within (0, {MAX_DEADLINE_HOURS})h"
            )));
        }
        Self::at(Utc::now() + Duration::hours(hours))
    }

    /// A deadline at an absolute point in time (not before the epoch).
    pub fn at(when: DateTime<Utc>) -> Result<Self, TransactionError> {
        let millis = when.timestamp_millis() - NETWORK_EPOCH_MS;
        if millis < 0 {
            return Err(TransactionError::InvalidDeadline(format!(
                "{when} is before the network epoch"
            )));
        }
        Ok(Self(Uint64::from_u64(millis as u64)))
    }

    /// Raw milliseconds since the network epoch.
    pub fn from_network_millis(millis: u64) -> Self {
        Self(Uint64::from_u64(millis))
    }

    pub fn value(&self) -> Uint64 {
        self.0
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let unix_ms = i64::try_from(self.0.to_u64()).ok()?.checked_add(NETWORK_EPOCH_MS)?;
        Utc.timestamp_millis_opt(unix_ms).single()
    }
}

impl Default for Deadline {
    /// Two hours from now. The default window is always valid, so falling
    /// back to the epoch cannot actually happen.
    fn default() -> Self {
        Self::create(DEFAULT_DEADLINE_HOURS).unwrap_or(Self(Uint64::ZERO))
    }
}
