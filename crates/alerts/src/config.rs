//! Channel configuration types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed-window rate limit: at most `max_calls` per `period_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub max_calls: u32,
    pub period_secs: u64,
}

impl RateLimitConfig {
    pub fn new(max_calls: u32, period_secs: u64) -> Self {
        Self {
            max_calls,
            period_secs,
        }
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs)
    }

    /// Twitter free tier allows a few dozen posts per day.
    pub fn twitter() -> Self {
        Self::new(50, 24 * 60 * 60)
    }

    /// Telegram allows about one message per second per chat, 20 per
    /// minute in groups.
    pub fn telegram() -> Self {
        Self::new(20, 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(RateLimitConfig::twitter().period(), Duration::from_secs(86_400));
        assert_eq!(RateLimitConfig::telegram().max_calls, 20);
    }
}
