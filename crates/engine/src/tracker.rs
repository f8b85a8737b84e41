//! Finds the most recent confirmed epoch to start syncing from.

use std::time::Duration;
use tracing::{debug, info, warn};
use witwhalert_core::Epoch;
use witwhalert_explorer::{Explorer, RangeStart};

/// Lookback used for the first probe below the chain head.
pub const INITIAL_LOOKBACK: u64 = 10;

/// Exponential lookback search for a confirmed block.
#[derive(Debug, Clone)]
pub struct ConfirmationTracker {
    initial_lookback: u64,
    retry_delay: Duration,
}

impl ConfirmationTracker {
    /// `retry_delay` is waited after a failed query or after a search that
    /// reached the first epoch without finding a confirmed block.
    pub fn new(retry_delay: Duration) -> Self {
        Self {
            initial_lookback: INITIAL_LOOKBACK,
            retry_delay,
        }
    }

    pub fn with_initial_lookback(mut self, lookback: u64) -> Self {
        self.initial_lookback = lookback.max(1);
        self
    }

    /// Highest confirmed epoch within the first window below the head that
    /// contains one. Probes `head - lookback`, doubling `lookback` until a
    /// confirmed block shows up. Never gives up.
    pub async fn last_confirmed_epoch<E: Explorer + ?Sized>(&self, explorer: &E) -> Epoch {
        loop {
            let head = match explorer.head_epoch().await {
                Ok(Some(head)) => head,
                Ok(None) => {
                    warn!("Explorer reported no blocks, retrying");
                    tokio::time::sleep(self.retry_delay).await;
                    continue;
                }
                Err(e) => {
                    warn!(error = %e, "Could not read chain head, retrying");
                    tokio::time::sleep(self.retry_delay).await;
                    continue;
                }
            };

            if let Some(epoch) = self.search_below(explorer, head).await {
                return epoch;
            }
            tokio::time::sleep(self.retry_delay).await;
        }
    }

    /// One lookback search from `head`. Returns `None` once the window
    /// covers the whole chain without a confirmed block.
    async fn search_below<E: Explorer + ?Sized>(&self, explorer: &E, head: Epoch) -> Option<Epoch> {
        let mut lookback = self.initial_lookback;

        loop {
            let start = head.saturating_sub(lookback).max(1);

            match explorer.fetch_range(RangeStart::From(start)).await {
                Ok(blocks) => {
                    let confirmed = blocks.iter().filter(|b| b.confirmed).max_by_key(|b| b.epoch);
                    if let Some(block) = confirmed {
                        info!(
                            epoch = block.epoch,
                            hash = %block.hash,
                            head,
                            lookback,
                            "Latest confirmed block found"
                        );
                        return Some(block.epoch);
                    }
                    debug!(head, lookback, start, "No confirmed block in window");
                }
                Err(e) => {
                    warn!(start, error = %e, "Lookback query failed, retrying");
                    tokio::time::sleep(self.retry_delay).await;
                    continue;
                }
            }

            if start == 1 {
                warn!(head, "No confirmed block anywhere below head");
                return None;
            }
            lookback = lookback.saturating_mul(2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedChain;
    use pretty_assertions::assert_eq;

    fn tracker() -> ConfirmationTracker {
        ConfirmationTracker::new(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_confirmed_within_first_window() {
        let chain = ScriptedChain::linear(100, 95);
        assert_eq!(tracker().last_confirmed_epoch(&chain).await, 95);
        assert_eq!(chain.range_calls(), vec![RangeStart::Head, RangeStart::From(90)]);
    }

    #[tokio::test]
    async fn test_lookback_doubles_until_found() {
        // Confirmed up to 63: windows of 10 and 20 miss, the 40-wide
        // window finds it.
        let chain = ScriptedChain::linear(100, 63);
        assert_eq!(tracker().last_confirmed_epoch(&chain).await, 63);
        assert_eq!(
            chain.range_calls(),
            vec![
                RangeStart::Head,
                RangeStart::From(90),
                RangeStart::From(80),
                RangeStart::From(60),
            ]
        );
    }

    #[tokio::test]
    async fn test_custom_initial_lookback() {
        let chain = ScriptedChain::linear(100, 63);
        let tracker = tracker().with_initial_lookback(40);
        assert_eq!(tracker.last_confirmed_epoch(&chain).await, 63);
        assert_eq!(chain.range_calls(), vec![RangeStart::Head, RangeStart::From(60)]);
    }

    #[tokio::test]
    async fn test_zero_lookback_is_raised_to_one() {
        let chain = ScriptedChain::linear(100, 99);
        let tracker = tracker().with_initial_lookback(0);
        assert_eq!(tracker.last_confirmed_epoch(&chain).await, 99);
        assert_eq!(chain.range_calls(), vec![RangeStart::Head, RangeStart::From(99)]);
    }

    #[tokio::test]
    async fn test_lookback_clamps_at_first_epoch() {
        let chain = ScriptedChain::linear(30, 2);
        assert_eq!(tracker().last_confirmed_epoch(&chain).await, 2);
        assert_eq!(chain.range_calls().last(), Some(&RangeStart::From(1)));
    }

    #[tokio::test]
    async fn test_retries_after_failures() {
        let chain = ScriptedChain::linear(100, 95);
        chain.fail_next_ranges(2);
        assert_eq!(tracker().last_confirmed_epoch(&chain).await, 95);
        assert_eq!(chain.range_calls().len(), 4);
    }

    #[tokio::test]
    async fn test_search_gives_up_on_unconfirmed_chain() {
        let chain = ScriptedChain::linear(25, 0);
        assert_eq!(tracker().search_below(&chain, 25).await, None);
        assert_eq!(
            chain.range_calls(),
            vec![RangeStart::From(15), RangeStart::From(5), RangeStart::From(1)]
        );
    }
}
