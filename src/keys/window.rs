//! Active Hours Module
//!
//! Selects between the in-window and after-window TTL based on wall-clock time.

use chrono::{DateTime, NaiveTime, TimeZone, Utc};

use crate::error::{CacheError, Result};
use crate::keys::Ttl;

// == Active Hours ==
/// Hour range treated as the active period.
///
/// Both ends are inclusive at `hh:00:00`: with the default 8 → 20 window,
/// `08:00:00` and `20:00:00` are in window, `20:00:01` is not. When
/// `start_hour > end_hour` the window wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveHours {
    start_hour: u32,
    end_hour: u32,
}

impl ActiveHours {
    /// Creates a window, rejecting hours outside 0..=23.
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self> {
        for (label, hour) in [("start", start_hour), ("end", end_hour)] {
            if hour > 23 {
                return Err(CacheError::InvalidConfig(format!(
                    "active {} hour must be within 0..=23, got {}",
                    label, hour
                )));
            }
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    /// Returns true if `now`'s local wall-clock time falls inside the window.
    pub fn contains<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        let time = now.time();
        let start = hour_mark(self.start_hour);
        let end = hour_mark(self.end_hour);

        if start <= end {
            time >= start && time <= end
        } else {
            time >= start || time <= end
        }
    }
}

impl Default for ActiveHours {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 20,
        }
    }
}

fn hour_mark(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN)
}

// == Resolve TTL ==
/// Picks the effective TTL for `now` and converts it to an absolute expiry.
///
/// Without an after-window TTL the in-window TTL always applies.
pub fn resolve_ttl<Tz: TimeZone>(
    in_window: &Ttl,
    after_window: Option<&Ttl>,
    now: &DateTime<Tz>,
    window: &ActiveHours,
) -> DateTime<Utc> {
    let now_utc = now.with_timezone(&Utc);

    match after_window {
        Some(after) if !window.contains(now) => after.resolve(now_utc),
        _ => in_window.resolve(now_utc),
    }
}
