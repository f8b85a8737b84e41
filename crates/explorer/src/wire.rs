//! Explorer response shapes and their conversion into core types.
//!
//! Range rows are JSON arrays whose fields are only identified by
//! position, so they are decoded here and nowhere else.

use crate::error::ExplorerError;
use serde::Deserialize;
use serde_json::Value;
use witwhalert_core::{Address, BlockDetail, BlockSummary, NanoWit, ValueTransfer};

const ROW_HASH: usize = 0;
const ROW_EPOCH: usize = 1;
const ROW_TIMESTAMP: usize = 2;
const ROW_TRANSFER_COUNT: usize = 4;
const ROW_CONFIRMED: usize = 10;

/// `GET /blockchain` response.
#[derive(Debug, Deserialize)]
pub struct RangeResponse {
    pub blockchain: Vec<Vec<Value>>,
}

impl RangeResponse {
    /// Decode every row. One bad row fails the whole response so that a
    /// block is never silently stepped over.
    pub fn into_summaries(self) -> Result<Vec<BlockSummary>, ExplorerError> {
        self.blockchain
            .iter()
            .enumerate()
            .map(|(i, row)| decode_row(row).ok_or_else(|| malformed_row(i, row)))
            .collect()
    }
}

fn malformed_row(index: usize, row: &[Value]) -> ExplorerError {
    ExplorerError::Malformed(format!("blockchain row {}: {:?}", index, row))
}

fn decode_row(row: &[Value]) -> Option<BlockSummary> {
    Some(BlockSummary {
        hash: row.get(ROW_HASH)?.as_str()?.to_string(),
        epoch: row.get(ROW_EPOCH)?.as_u64()?,
        timestamp: row.get(ROW_TIMESTAMP)?.as_i64()?,
        transfer_count: u32::try_from(row.get(ROW_TRANSFER_COUNT)?.as_u64()?).ok()?,
        confirmed: row.get(ROW_CONFIRMED)?.as_bool()?,
    })
}

/// `GET /hash?value=` response for a block.
#[derive(Debug, Deserialize)]
pub struct DetailResponse {
    pub block_hash: String,
    pub epoch: u64,
    pub time: i64,
    #[serde(default)]
    pub value_transfer_txns: Vec<ValueTransferWire>,
}

#[derive(Debug, Deserialize)]
pub struct ValueTransferWire {
    pub txn_hash: String,
    #[serde(default)]
    pub unique_input_addresses: Vec<String>,
    #[serde(default)]
    pub real_output_addresses: Vec<String>,
    pub value: u64,
}

impl From<DetailResponse> for BlockDetail {
    fn from(wire: DetailResponse) -> Self {
        BlockDetail {
            hash: wire.block_hash,
            epoch: wire.epoch,
            timestamp: wire.time,
            transactions: wire
                .value_transfer_txns
                .into_iter()
                .map(ValueTransfer::from)
                .collect(),
        }
    }
}

impl From<ValueTransferWire> for ValueTransfer {
    fn from(wire: ValueTransferWire) -> Self {
        ValueTransfer {
            txn_hash: wire.txn_hash,
            inputs: wire.unique_input_addresses.into_iter().map(Address).collect(),
            outputs: wire.real_output_addresses.into_iter().map(Address).collect(),
            value: NanoWit(wire.value),
        }
    }
}

/// Decode a range response body.
pub fn parse_range(body: &str) -> Result<Vec<BlockSummary>, ExplorerError> {
    serde_json::from_str::<RangeResponse>(body)?.into_summaries()
}

/// Decode a block detail response body.
pub fn parse_detail(body: &str) -> Result<BlockDetail, ExplorerError> {
    Ok(serde_json::from_str::<DetailResponse>(body)?.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_range_reads_positions() {
        let body = r#"{"blockchain": [
            ["aa11", 1000, 1700000000, "miner", 3, 0, 0, 0, 0, false, true],
            ["bb22", 1001, 1700000045, "miner", 0, 1, 0, 0, 0, false, false]
        ]}"#;

        let blocks = parse_range(body).unwrap();
        assert_eq!(
            blocks,
            vec![
                BlockSummary {
                    hash: "aa11".into(),
                    epoch: 1000,
                    timestamp: 1_700_000_000,
                    transfer_count: 3,
                    confirmed: true,
                },
                BlockSummary {
                    hash: "bb22".into(),
                    epoch: 1001,
                    timestamp: 1_700_000_045,
                    transfer_count: 0,
                    confirmed: false,
                },
            ]
        );
    }

    #[test]
    fn test_parse_empty_range() {
        assert!(parse_range(r#"{"blockchain": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_missing_key_is_malformed() {
        assert!(matches!(
            parse_range(r#"{"error": "busy"}"#),
            Err(ExplorerError::Malformed(_))
        ));
    }

    #[test]
    fn test_short_row_is_malformed() {
        let body = r#"{"blockchain": [["aa11", 1000, 1700000000, "miner", 3]]}"#;
        assert!(matches!(parse_range(body), Err(ExplorerError::Malformed(_))));
    }

    #[test]
    fn test_parse_detail() {
        let body = r#"{
            "block_hash": "aa11",
            "epoch": 1000,
            "time": 1700000000,
            "value_transfer_txns": [{
                "txn_hash": "tx1",
                "unique_input_addresses": ["wit1a", "wit1b"],
                "real_output_addresses": ["wit1c"],
                "value": 45000000000000
            }]
        }"#;

        let detail = parse_detail(body).unwrap();
        assert_eq!(detail.hash, "aa11");
        assert_eq!(detail.epoch, 1000);
        assert_eq!(detail.transactions.len(), 1);

        let tx = &detail.transactions[0];
        assert_eq!(tx.txn_hash, "tx1");
        assert_eq!(tx.inputs.len(), 2);
        assert!(tx.outputs.contains(&Address::from("wit1c")));
        assert_eq!(tx.amount(), 45_000);
    }

    #[test]
    fn test_detail_without_transfers() {
        let body = r#"{"block_hash": "aa11", "epoch": 5, "time": 1}"#;
        assert!(parse_detail(body).unwrap().transactions.is_empty());
    }
}
