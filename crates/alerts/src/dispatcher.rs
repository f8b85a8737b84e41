//! Alert dispatch across channels.

use crate::channel::Channel;
use crate::config::RateLimitConfig;
use crate::format::{AlertFormatter, MessageFormat};
use crate::limiter::FixedWindowLimiter;
use std::time::Instant;
use tracing::{info, warn};
use witwhalert_core::Alert;

/// A channel together with its own rate limiter.
pub struct RateLimitedChannel {
    channel: Box<dyn Channel>,
    limiter: FixedWindowLimiter,
}

impl RateLimitedChannel {
    pub fn new(channel: Box<dyn Channel>, limit: RateLimitConfig) -> Self {
        Self {
            channel,
            limiter: FixedWindowLimiter::new(limit),
        }
    }

    pub fn name(&self) -> &str {
        self.channel.name()
    }
}

/// Outcome counts for one alert.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub sent: u32,
    /// Refused by the rate limiter.
    pub dropped: u32,
    pub failed: u32,
}

/// Sends each alert to every registered channel. A channel that is rate
/// limited or failing never affects the others.
pub struct ChannelDispatcher {
    formatter: AlertFormatter,
    channels: Vec<RateLimitedChannel>,
}

impl ChannelDispatcher {
    pub fn new(formatter: AlertFormatter) -> Self {
        Self {
            formatter,
            channels: Vec::new(),
        }
    }

    /// Register a channel.
    pub fn with_channel(mut self, channel: Box<dyn Channel>, limit: RateLimitConfig) -> Self {
        self.channels.push(RateLimitedChannel::new(channel, limit));
        self
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub async fn dispatch(&mut self, alert: &Alert) -> DispatchReport {
        self.dispatch_at(alert, Instant::now()).await
    }

    /// Dispatch with an explicit clock reading for the rate limiters.
    pub async fn dispatch_at(&mut self, alert: &Alert, now: Instant) -> DispatchReport {
        let mut report = DispatchReport::default();

        if self.channels.is_empty() {
            info!(
                txn = %alert.txn_hash,
                text = %self.formatter.render(alert, MessageFormat::Plain),
                "No channels enabled, alert not posted"
            );
            return report;
        }

        for entry in &mut self.channels {
            let name = entry.channel.name().to_string();

            if !entry.limiter.try_acquire_at(now) {
                warn!(
                    channel = %name,
                    txn = %alert.txn_hash,
                    retry_in = ?entry.limiter.time_until_available(now),
                    "Rate limit reached, alert dropped"
                );
                report.dropped += 1;
                continue;
            }

            let message = self.formatter.render(alert, entry.channel.format());
            match entry.channel.post(&message).await {
                Ok(()) => {
                    info!(channel = %name, txn = %alert.txn_hash, amount = alert.amount, "Alert sent");
                    report.sent += 1;
                }
                Err(e) => {
                    warn!(channel = %name, txn = %alert.txn_hash, error = %e, "Failed to send alert");
                    report.failed += 1;
                }
            }
        }

        report
    }
}
