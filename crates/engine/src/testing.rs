//! In-memory explorer and channel used by engine tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use witwhalert_alerts::{Channel, ChannelError, MessageFormat};
use witwhalert_core::{BlockDetail, BlockSummary, Epoch};
use witwhalert_explorer::{Explorer, ExplorerError, RangeStart};

/// How many blocks an `init` query returns.
const HEAD_PAGE: usize = 10;

#[derive(Default)]
struct ChainState {
    blocks: Vec<BlockSummary>,
    details: HashMap<String, BlockDetail>,
    failing_ranges: u32,
    failing_details: u32,
    empty_appends: u32,
    append_overlap: u64,
    range_calls: Vec<RangeStart>,
    detail_calls: Vec<String>,
}

/// A chain of blocks served through the `Explorer` trait.
#[derive(Default)]
pub struct ScriptedChain {
    state: Mutex<ChainState>,
}

pub fn block_hash(epoch: Epoch) -> String {
    format!("block{epoch}")
}

impl ScriptedChain {
    /// Blocks `1..=head`, confirmed up to and including `confirmed_upto`.
    pub fn linear(head: Epoch, confirmed_upto: Epoch) -> Self {
        let chain = Self::default();
        for epoch in 1..=head {
            chain.push(epoch, 0, epoch <= confirmed_upto);
        }
        chain
    }

    pub fn push(&self, epoch: Epoch, transfer_count: u32, confirmed: bool) {
        let mut state = self.state.lock().unwrap();
        state.blocks.push(BlockSummary {
            hash: block_hash(epoch),
            epoch,
            timestamp: 1_700_000_000 + epoch as i64 * 45,
            transfer_count,
            confirmed,
        });
    }

    pub fn set_detail(&self, detail: BlockDetail) {
        let mut state = self.state.lock().unwrap();
        state.details.insert(detail.hash.clone(), detail);
    }

    pub fn confirm_through(&self, epoch: Epoch) {
        let mut state = self.state.lock().unwrap();
        for block in state.blocks.iter_mut().filter(|b| b.epoch <= epoch) {
            block.confirmed = true;
        }
    }

    /// Reverse the order blocks are served in.
    pub fn shuffle_order(&self) {
        self.state.lock().unwrap().blocks.reverse();
    }

    pub fn fail_next_ranges(&self, count: u32) {
        self.state.lock().unwrap().failing_ranges = count;
    }

    /// Next `count` append queries answer with no blocks.
    pub fn empty_next_appends(&self, count: u32) {
        self.state.lock().unwrap().empty_appends = count;
    }

    /// Append queries also return `overlap` blocks before the requested epoch.
    pub fn set_append_overlap(&self, overlap: u64) {
        self.state.lock().unwrap().append_overlap = overlap;
    }

    pub fn fail_next_details(&self, count: u32) {
        self.state.lock().unwrap().failing_details = count;
    }

    pub fn range_calls(&self) -> Vec<RangeStart> {
        self.state.lock().unwrap().range_calls.clone()
    }

    pub fn detail_calls(&self) -> Vec<String> {
        self.state.lock().unwrap().detail_calls.clone()
    }
}

#[async_trait]
impl Explorer for ScriptedChain {
    async fn fetch_range(&self, start: RangeStart) -> Result<Vec<BlockSummary>, ExplorerError> {
        let mut state = self.state.lock().unwrap();
        state.range_calls.push(start);

        if state.failing_ranges > 0 {
            state.failing_ranges -= 1;
            return Err(ExplorerError::Timeout("scripted".into()));
        }

        let mut blocks = state.blocks.clone();
        match start {
            RangeStart::Head => {
                let mut sorted = blocks.clone();
                sorted.sort_by_key(|b| b.epoch);
                let skip = sorted.len().saturating_sub(HEAD_PAGE);
                blocks = sorted.split_off(skip);
            }
            RangeStart::From(_) if state.empty_appends > 0 => {
                state.empty_appends -= 1;
                blocks.clear();
            }
            RangeStart::From(from) => {
                let lowest = from.saturating_sub(state.append_overlap);
                blocks.retain(|b| b.epoch >= lowest);
            }
        }
        Ok(blocks)
    }

    async fn fetch_detail(&self, block_hash: &str) -> Result<BlockDetail, ExplorerError> {
        let mut state = self.state.lock().unwrap();
        state.detail_calls.push(block_hash.to_string());

        if state.failing_details > 0 {
            state.failing_details -= 1;
            return Err(ExplorerError::Status(503));
        }

        state
            .details
            .get(block_hash)
            .cloned()
            .ok_or_else(|| ExplorerError::Malformed(format!("unknown block {block_hash}")))
    }
}

/// Channel that keeps every message it is asked to post.
pub struct RecordingChannel {
    pub format: MessageFormat,
    pub posts: Arc<Mutex<Vec<String>>>,
}

impl RecordingChannel {
    pub fn new(format: MessageFormat) -> (Box<dyn Channel>, Arc<Mutex<Vec<String>>>) {
        let posts = Arc::new(Mutex::new(Vec::new()));
        let channel = Self {
            format,
            posts: Arc::clone(&posts),
        };
        (Box::new(channel), posts)
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    fn format(&self) -> MessageFormat {
        self.format
    }

    async fn post(&self, message: &str) -> Result<(), ChannelError> {
        self.posts.lock().unwrap().push(message.to_string());
        Ok(())
    }
}
