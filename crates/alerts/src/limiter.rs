//! Fixed-window rate limiter.

use crate::config::RateLimitConfig;
use std::time::{Duration, Instant};

/// Counts calls in a window that opens on the first call and resets once
/// more than `period` has elapsed since it opened. Calls over the limit
/// are refused, never queued.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    max_calls: u32,
    period: Duration,
    window_start: Option<Instant>,
    count: u32,
}

impl FixedWindowLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            max_calls: config.max_calls,
            period: config.period(),
            window_start: None,
            count: 0,
        }
    }

    /// Try to take a slot now.
    pub fn try_acquire(&mut self) -> bool {
        self.try_acquire_at(Instant::now())
    }

    /// Try to take a slot at `now`.
    pub fn try_acquire_at(&mut self, now: Instant) -> bool {
        match self.window_start {
            Some(start) if now.saturating_duration_since(start) <= self.period => {}
            _ => {
                self.window_start = Some(now);
                self.count = 0;
            }
        }

        if self.count >= self.max_calls {
            return false;
        }
        self.count += 1;
        true
    }

    /// Calls accepted in the current window.
    pub fn calls_in_window(&self) -> u32 {
        self.count
    }

    /// Time until the current window resets, zero if a call would pass.
    pub fn time_until_available(&self, now: Instant) -> Duration {
        match self.window_start {
            Some(start) if self.count >= self.max_calls => {
                (start + self.period).saturating_duration_since(now)
            }
            _ => Duration::ZERO,
        }
    }
}
