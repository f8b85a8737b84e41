//! Polling loop that walks confirmed blocks in epoch order and turns their
//! value transfers into alerts.

use crate::classifier::Classifier;
use crate::tracker::ConfirmationTracker;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tracing::{debug, info, warn};
use witwhalert_alerts::ChannelDispatcher;
use witwhalert_core::{BlockSummary, Epoch};
use witwhalert_explorer::{Explorer, RangeStart};

/// Timing of the sync loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Sleep between poll cycles.
    pub poll_interval: Duration,
    /// Pause after each block with transfers.
    pub block_pacing: Duration,
    /// Sleep after a failed detail fetch.
    pub detail_backoff: Duration,
}

impl SyncConfig {
    /// Detail backoff is five poll intervals.
    pub fn new(poll_interval: Duration, block_pacing: Duration) -> Self {
        Self {
            poll_interval,
            block_pacing,
            detail_backoff: poll_interval * 5,
        }
    }

    /// No sleeping at all.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new(Duration::from_secs(30), Duration::from_secs(5))
    }
}

/// Where the loop is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Confirmed watermark not known yet.
    Bootstrap,
    /// Steady state; `watermark` is the next epoch to process.
    Polling { watermark: Epoch },
}

/// Counters for one poll cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleStats {
    pub blocks: u32,
    pub transfers: u32,
    pub alerts: u32,
    pub sent: u32,
}

/// Result of one poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Head has not reached the watermark.
    UpToDate,
    /// Explorer answered with no blocks.
    NoData,
    /// Explorer query failed; nothing changed.
    FetchFailed,
    Processed(CycleStats),
}

/// Single-threaded sync loop. Owns the watermark and every piece of
/// mutable state it touches.
pub struct SyncLoop<E> {
    explorer: E,
    tracker: ConfirmationTracker,
    classifier: Classifier,
    dispatcher: ChannelDispatcher,
    config: SyncConfig,
    state: SyncState,
    rng: StdRng,
}

impl<E: Explorer> SyncLoop<E> {
    pub fn new(
        explorer: E,
        classifier: Classifier,
        dispatcher: ChannelDispatcher,
        config: SyncConfig,
    ) -> Self {
        Self {
            explorer,
            tracker: ConfirmationTracker::new(config.poll_interval),
            classifier,
            dispatcher,
            config,
            state: SyncState::Bootstrap,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace the random source used for muting.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_tracker(mut self, tracker: ConfirmationTracker) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn explorer(&self) -> &E {
        &self.explorer
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn watermark(&self) -> Option<Epoch> {
        match self.state {
            SyncState::Bootstrap => None,
            SyncState::Polling { watermark } => Some(watermark),
        }
    }

    /// Run forever.
    pub async fn run(mut self) {
        info!(
            poll_secs = self.config.poll_interval.as_secs(),
            "Starting sync loop"
        );
        loop {
            if self.state != SyncState::Bootstrap {
                tokio::time::sleep(self.config.poll_interval).await;
            }
            self.poll_once().await;
        }
    }

    /// Find the confirmed watermark and enter polling.
    pub async fn bootstrap(&mut self) -> Epoch {
        let watermark = self.tracker.last_confirmed_epoch(&self.explorer).await;
        info!(watermark, "Sync watermark set");
        self.state = SyncState::Polling { watermark };
        watermark
    }

    /// One poll cycle (bootstrapping first if needed).
    pub async fn poll_once(&mut self) -> CycleOutcome {
        let watermark = match self.state {
            SyncState::Bootstrap => self.bootstrap().await,
            SyncState::Polling { watermark } => watermark,
        };

        let head = match self.explorer.head_epoch().await {
            Ok(Some(head)) => head,
            Ok(None) => {
                debug!("Explorer returned no head block");
                return CycleOutcome::NoData;
            }
            Err(e) => {
                warn!(error = %e, transient = e.is_transient(), "Head query failed");
                return CycleOutcome::FetchFailed;
            }
        };

        if head < watermark {
            debug!(head, watermark, "Up to date");
            return CycleOutcome::UpToDate;
        }

        let mut blocks = match self.explorer.fetch_range(RangeStart::From(watermark)).await {
            Ok(blocks) if blocks.is_empty() => {
                debug!(watermark, "No blocks returned");
                return CycleOutcome::NoData;
            }
            Ok(blocks) => blocks,
            Err(e) => {
                warn!(watermark, error = %e, transient = e.is_transient(), "Range query failed");
                return CycleOutcome::FetchFailed;
            }
        };

        blocks.sort_by_key(|b| b.epoch);
        info!(count = blocks.len(), watermark, head, "Blocks retrieved, processing");

        let mut stats = CycleStats::default();
        for block in &blocks {
            let watermark = self.watermark().unwrap_or(watermark);
            if block.epoch < watermark {
                continue;
            }
            if !block.confirmed {
                debug!(epoch = block.epoch, "Unconfirmed block, waiting for next cycle");
                break;
            }

            self.state = SyncState::Polling {
                watermark: block.epoch + 1,
            };
            stats.blocks += 1;
            self.process_block(block, &mut stats).await;
        }

        CycleOutcome::Processed(stats)
    }

    async fn process_block(&mut self, block: &BlockSummary, stats: &mut CycleStats) {
        if !block.has_transfers() {
            info!(
                time = %local_time(block.timestamp),
                epoch = block.epoch,
                hash = %block.hash,
                "No value transfers"
            );
            return;
        }

        let detail = match self.explorer.fetch_detail(&block.hash).await {
            Ok(detail) => detail,
            Err(e) => {
                warn!(
                    epoch = block.epoch,
                    hash = %block.hash,
                    error = %e,
                    backoff_secs = self.config.detail_backoff.as_secs(),
                    "Could not retrieve block, skipping"
                );
                tokio::time::sleep(self.config.detail_backoff).await;
                return;
            }
        };

        info!(
            time = %local_time(detail.timestamp),
            epoch = detail.epoch,
            hash = %detail.hash,
            transfers = detail.transactions.len(),
            "Confirmed block"
        );

        for transfer in &detail.transactions {
            stats.transfers += 1;
            let outputs: Vec<&str> = transfer.outputs.iter().map(|a| a.as_str()).collect();
            info!(
                txn = %transfer.txn_hash,
                amount = transfer.amount(),
                to = %outputs.join(", "),
                "Value transfer"
            );

            if let Some(alert) = self.classifier.evaluate(transfer, &mut self.rng) {
                stats.alerts += 1;
                let report = self.dispatcher.dispatch(&alert).await;
                stats.sent += report.sent;
            }
        }

        tokio::time::sleep(self.config.block_pacing).await;
    }
}

fn local_time(timestamp: i64) -> String {
    match chrono::DateTime::from_timestamp(timestamp, 0) {
        Some(utc) => utc
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => timestamp.to_string(),
    }
}
