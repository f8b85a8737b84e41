//! The explorer seam.

use crate::error::ExplorerError;
use async_trait::async_trait;
use witwhalert_core::{BlockDetail, BlockSummary, Epoch};

/// Where a range query starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeStart {
    /// The most recent blocks (explorer `init` query).
    Head,
    /// Blocks from this epoch onward (explorer `append` query).
    From(Epoch),
}

impl From<Epoch> for RangeStart {
    /// Epoch 0 is the bootstrap sentinel and maps to `Head`.
    fn from(epoch: Epoch) -> Self {
        if epoch == 0 {
            RangeStart::Head
        } else {
            RangeStart::From(epoch)
        }
    }
}

/// Read-only access to a block explorer.
///
/// Each call is independent: no retry state is carried between calls.
/// Callers decide what a failure means for them.
#[async_trait]
pub trait Explorer: Send + Sync {
    /// Fetch block summaries starting at `start`. An empty vector means the
    /// explorer had nothing to report.
    async fn fetch_range(&self, start: RangeStart) -> Result<Vec<BlockSummary>, ExplorerError>;

    /// Fetch a full block with its value transfers.
    async fn fetch_detail(&self, block_hash: &str) -> Result<BlockDetail, ExplorerError>;

    /// Epoch of the latest block, if the explorer reports any.
    async fn head_epoch(&self) -> Result<Option<Epoch>, ExplorerError> {
        let blocks = self.fetch_range(RangeStart::Head).await?;
        Ok(blocks.iter().map(|b| b.epoch).max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_zero_is_head() {
        assert_eq!(RangeStart::from(0), RangeStart::Head);
        assert_eq!(RangeStart::from(42), RangeStart::From(42));
    }
}
