//! Block and value transfer types as seen by the rest of the system.
//!
//! The explorer speaks in positional arrays; these are the named shapes
//! it gets decoded into right at the HTTP boundary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Monotonic block-sequence index.
pub type Epoch = u64;

/// Blockchain address (bech32 string as returned by the explorer).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub String);

impl Address {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Fixed-point token amount in the smallest unit (nanoWIT).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NanoWit(pub u64);

impl NanoWit {
    /// Scale factor: 10^9 nanoWIT per WIT.
    pub const SCALE: u64 = 1_000_000_000;

    /// Whole tokens, truncated toward zero.
    #[inline]
    pub fn whole_wits(self) -> u64 {
        self.0 / Self::SCALE
    }
}

/// One row of a range query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub hash: String,
    pub epoch: Epoch,
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    pub transfer_count: u32,
    pub confirmed: bool,
}

impl BlockSummary {
    #[inline]
    pub fn has_transfers(&self) -> bool {
        self.transfer_count > 0
    }
}

/// A value transfer transaction inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueTransfer {
    pub txn_hash: String,
    pub inputs: BTreeSet<Address>,
    pub outputs: BTreeSet<Address>,
    pub value: NanoWit,
}

impl ValueTransfer {
    /// Amount in whole WIT, the unit every threshold is expressed in.
    #[inline]
    pub fn amount(&self) -> u64 {
        self.value.whole_wits()
    }
}

/// Full block fetched on demand for blocks carrying value transfers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDetail {
    pub hash: String,
    pub epoch: Epoch,
    pub timestamp: i64,
    pub transactions: Vec<ValueTransfer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_wits_truncates() {
        assert_eq!(NanoWit(0).whole_wits(), 0);
        assert_eq!(NanoWit(999_999_999).whole_wits(), 0);
        assert_eq!(NanoWit(1_000_000_000).whole_wits(), 1);
        assert_eq!(NanoWit(45_000_999_999_999).whole_wits(), 45_000);
    }

    #[test]
    fn test_transfer_amount() {
        let transfer = ValueTransfer {
            txn_hash: "abc".to_string(),
            inputs: BTreeSet::from([Address::from("wit1in")]),
            outputs: BTreeSet::from([Address::from("wit1out")]),
            value: NanoWit(200_000 * NanoWit::SCALE + 7),
        };
        assert_eq!(transfer.amount(), 200_000);
    }

    #[test]
    fn test_address_serializes_as_plain_string() {
        let json = serde_json::to_string(&Address::from("wit1xyz")).unwrap();
        assert_eq!(json, "\"wit1xyz\"");
    }
}
