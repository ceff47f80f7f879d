// ABOUTME: Sliding-window rate limiter for outbound FoodData Central requests
// ABOUTME: Independent per-minute and per-hour thresholds over a pruned timestamp list
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

use std::time::{Duration, Instant};

use crate::errors::provider::{ProviderError, ProviderResult};
use crate::models::food::FoodSource;

/// Default requests allowed per rolling minute
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 1000;
/// Default requests allowed per rolling hour
pub const DEFAULT_REQUESTS_PER_HOUR: u32 = 10_000;

const MINUTE: Duration = Duration::from_secs(60);
const HOUR: Duration = Duration::from_secs(60 * 60);

/// Rolling-window request limiter.
///
/// Holds the timestamps of recent requests, pruned of entries older than one
/// hour on every check. Exceeding either the per-minute or per-hour
/// threshold fails *before* any network call is attempted, so an exhausted
/// quota never wastes a round-trip. Owned exclusively by one client
/// instance; the client serializes access behind a mutex.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    requests: Vec<Instant>,
    per_minute: u32,
    per_hour: u32,
}

impl SlidingWindowLimiter {
    /// Create a limiter with the given window thresholds
    #[must_use]
    pub const fn new(per_minute: u32, per_hour: u32) -> Self {
        Self {
            requests: Vec::new(),
            per_minute,
            per_hour,
        }
    }

    /// Check both windows and record the request when allowed.
    ///
    /// # Errors
    ///
    /// Fails with [`ProviderError::RateLimitMinute`] or
    /// [`ProviderError::RateLimitHour`] when the matching window is
    /// exhausted; the request is not recorded in that case.
    pub fn check_and_record(&mut self) -> ProviderResult<()> {
        self.check_and_record_at(Instant::now())
    }

    /// Deterministic variant of [`check_and_record`](Self::check_and_record)
    /// taking the current instant explicitly.
    ///
    /// # Errors
    ///
    /// Same as [`check_and_record`](Self::check_and_record).
    pub fn check_and_record_at(&mut self, now: Instant) -> ProviderResult<()> {
        self.requests
            .retain(|&t| now.saturating_duration_since(t) < HOUR);

        let minute_count = self
            .requests
            .iter()
            .filter(|&&t| now.saturating_duration_since(t) < MINUTE)
            .count();

        if minute_count >= self.per_minute as usize {
            return Err(ProviderError::RateLimitMinute {
                provider: FoodSource::FdcUsda,
                limit: self.per_minute,
            });
        }
        if self.requests.len() >= self.per_hour as usize {
            return Err(ProviderError::RateLimitHour {
                provider: FoodSource::FdcUsda,
                limit: self.per_hour,
            });
        }

        self.requests.push(now);
        Ok(())
    }

    /// Requests currently inside the hour window
    #[must_use]
    pub fn recorded(&self) -> usize {
        self.requests.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_the_minute_limit() {
        let mut limiter = SlidingWindowLimiter::new(3, 100);
        let now = Instant::now();
        for _ in 0..3 {
            limiter.check_and_record_at(now).unwrap();
        }
        let err = limiter.check_and_record_at(now).unwrap_err();
        assert_eq!(err.code(), "RATE_LIMIT_MINUTE");
        // The rejected request is not recorded.
        assert_eq!(limiter.recorded(), 3);
    }

    #[test]
    fn minute_window_rolls_over() {
        let mut limiter = SlidingWindowLimiter::new(2, 100);
        let start = Instant::now();
        limiter.check_and_record_at(start).unwrap();
        limiter.check_and_record_at(start).unwrap();
        assert!(limiter.check_and_record_at(start).is_err());

        // 61 seconds later the minute window is clear again.
        let later = start + Duration::from_secs(61);
        limiter.check_and_record_at(later).unwrap();
    }

    #[test]
    fn hour_limit_trips_independently() {
        let mut limiter = SlidingWindowLimiter::new(100, 2);
        let start = Instant::now();
        limiter.check_and_record_at(start).unwrap();
        // Spread past the minute window so only the hour cap applies.
        let later = start + Duration::from_secs(120);
        limiter.check_and_record_at(later).unwrap();
        let err = limiter.check_and_record_at(later).unwrap_err();
        assert_eq!(err.code(), "RATE_LIMIT_HOUR");
    }

    #[test]
    fn hour_window_prunes_old_entries() {
        let mut limiter = SlidingWindowLimiter::new(100, 2);
        let start = Instant::now();
        limiter.check_and_record_at(start).unwrap();
        limiter.check_and_record_at(start).unwrap();

        let later = start + Duration::from_secs(3601);
        limiter.check_and_record_at(later).unwrap();
        assert_eq!(limiter.recorded(), 1);
    }
}
