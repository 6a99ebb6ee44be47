//! Response shapes and the [`RosettaApi`] trait seam.
//!
//! The orchestrator and the selection layer depend on this trait rather
//! than on the concrete HTTP gateway, so tests can drive the whole
//! pipeline against an in-memory implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use rosetta_core::{
    AccountIdentifier, Amount, Asset, BlockIdentifier, ConstructedTransaction, Error, Operation,
    Result, Signature, SpendableInput, TransactionIdentifier,
};

/// `/network/status` response, reduced to what the client consumes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkStatusResponse {
    pub current_block_identifier: BlockIdentifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genesis_block_identifier: Option<BlockIdentifier>,
}

/// `/account/balance` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub block_identifier: BlockIdentifier,
    pub balances: Vec<Amount>,
}

/// One spendable coin as returned by `/account/coins`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub coin_identifier: rosetta_core::CoinIdentifier,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub metadata: Value,
}

impl Coin {
    /// Coin value in lovelace
    pub fn value(&self) -> Result<u64> {
        let value = self.amount.as_i64()?;
        u64::try_from(value).map_err(|_| {
            Error::validation(format!(
                "coin {} has negative value {value}",
                self.coin_identifier.identifier
            ))
        })
    }

    /// Native assets attached to this coin, empty for ADA-only UTXOs
    pub fn assets(&self) -> Vec<Asset> {
        let Some(entries) = self.metadata.get("assets").and_then(Value::as_array) else {
            return Vec::new();
        };
        entries
            .iter()
            .filter_map(|entry| {
                Some(Asset {
                    policy_id: entry.get("policy_id")?.as_str()?.to_string(),
                    asset_name: entry.get("asset_name")?.as_str()?.to_string(),
                    amount: asset_amount(entry.get("amount")?),
                })
            })
            .collect()
    }

    /// Converts the coin into a [`SpendableInput`] owned by `address`
    pub fn to_spendable_input(&self, address: &str) -> Result<SpendableInput> {
        Ok(SpendableInput {
            address: address.to_string(),
            value: self.value()?,
            coin_identifier: self.coin_identifier.identifier.clone(),
            assets: self.assets(),
            metadata: self
                .metadata
                .as_object()
                .cloned()
                .unwrap_or_default(),
        })
    }
}

// Asset amounts appear as either JSON numbers or strings depending on the
// server version.
fn asset_amount(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

/// `/construction/metadata` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataResponse {
    pub metadata: Value,
    /// Absent or empty means the draft outputs are used as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_fee: Option<Vec<Amount>>,
}

impl MetadataResponse {
    /// First suggested fee entry in lovelace, when the server provided one
    pub fn suggested_fee_value(&self) -> Result<Option<u64>> {
        match self.suggested_fee.as_deref() {
            Some([first, ..]) => {
                let value = first.as_i64()?;
                let fee = u64::try_from(value).map_err(|_| {
                    Error::validation(format!("negative suggested fee: {value}"))
                })?;
                Ok(Some(fee))
            }
            _ => Ok(None),
        }
    }
}

/// `/construction/parse` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResponse {
    pub operations: Vec<Operation>,
    /// Present only when parsing a signed transaction
    #[serde(default)]
    pub account_identifier_signers: Vec<AccountIdentifier>,
}

/// A transaction as it appears inside a block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockTransaction {
    pub transaction_identifier: TransactionIdentifier,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

/// Block contents returned by `/block`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub block_identifier: BlockIdentifier,
    #[serde(default)]
    pub transactions: Vec<BlockTransaction>,
}

/// `/block` response; `block` can be absent while the node is syncing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<Block>,
}

/// The construction and read operations the test client drives.
///
/// Every call attaches the session's fixed network identifier. Failures
/// follow the single classification rule: transport failures and 5xx map
/// to [`Error::Network`], 4xx maps to [`Error::Validation`] carrying the
/// parsed server body when one is available.
#[async_trait]
pub trait RosettaApi: Send + Sync {
    /// `/network/status`
    async fn network_status(&self) -> Result<NetworkStatusResponse>;

    /// `/account/balance`
    async fn get_balance(&self, address: &str) -> Result<BalanceResponse>;

    /// `/account/coins` with mempool entries included
    async fn get_utxos(&self, address: &str) -> Result<Vec<Coin>>;

    /// `/construction/preprocess`, returns the opaque options object
    async fn preprocess(&self, operations: &[Operation]) -> Result<Value>;

    /// `/construction/metadata`
    async fn fetch_metadata(&self, options: &Value) -> Result<MetadataResponse>;

    /// `/construction/payloads`
    async fn create_payloads(
        &self,
        operations: &[Operation],
        metadata: &Value,
    ) -> Result<ConstructedTransaction>;

    /// `/construction/combine`, returns the signed transaction encoding
    async fn combine(
        &self,
        unsigned_transaction: &str,
        signatures: &[Signature],
    ) -> Result<String>;

    /// `/construction/submit`
    async fn submit(&self, signed_transaction: &str) -> Result<TransactionIdentifier>;

    /// `/construction/hash`
    async fn get_transaction_hash(&self, signed_transaction: &str)
        -> Result<TransactionIdentifier>;

    /// `/construction/parse`
    async fn parse(&self, transaction_hex: &str, signed: bool) -> Result<ParseResponse>;

    /// `/block`
    async fn get_block(&self, block: &BlockIdentifier) -> Result<BlockResponse>;

    /// `/block/transaction`
    async fn get_block_transaction(
        &self,
        block: &BlockIdentifier,
        tx_hash: &str,
    ) -> Result<BlockTransaction>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coin_assets_parsed_from_metadata() {
        let coin: Coin = serde_json::from_value(json!({
            "coin_identifier": {"identifier": "tx:0"},
            "amount": {"value": "5000000", "currency": {"symbol": "ADA", "decimals": 6}},
            "metadata": {
                "assets": [
                    {"policy_id": "p1", "asset_name": "TOKEN", "amount": "42"},
                    {"policy_id": "p2", "asset_name": "OTHER", "amount": 7}
                ]
            }
        }))
        .unwrap();

        assert_eq!(coin.value().unwrap(), 5_000_000);
        let assets = coin.assets();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].amount, 42);
        assert_eq!(assets[1].amount, 7);
    }

    #[test]
    fn test_coin_without_metadata_is_ada_only() {
        let coin: Coin = serde_json::from_value(json!({
            "coin_identifier": {"identifier": "tx:1"},
            "amount": {"value": "1000000", "currency": {"symbol": "ADA", "decimals": 6}}
        }))
        .unwrap();

        assert!(coin.assets().is_empty());
        let input = coin.to_spendable_input("addr_test1abc").unwrap();
        assert!(input.is_ada_only());
        assert_eq!(input.value, 1_000_000);
        assert_eq!(input.coin_identifier, "tx:1");
    }

    #[test]
    fn test_negative_coin_value_rejected() {
        let coin: Coin = serde_json::from_value(json!({
            "coin_identifier": {"identifier": "tx:2"},
            "amount": {"value": "-1", "currency": {"symbol": "ADA", "decimals": 6}}
        }))
        .unwrap();
        assert!(coin.value().is_err());
    }

    #[test]
    fn test_suggested_fee_first_entry_wins() {
        let response: MetadataResponse = serde_json::from_value(json!({
            "metadata": {"ttl": "1000"},
            "suggested_fee": [
                {"value": "180000", "currency": {"symbol": "ADA", "decimals": 6}},
                {"value": "999999", "currency": {"symbol": "ADA", "decimals": 6}}
            ]
        }))
        .unwrap();
        assert_eq!(response.suggested_fee_value().unwrap(), Some(180_000));
    }

    #[test]
    fn test_absent_suggested_fee() {
        let response: MetadataResponse =
            serde_json::from_value(json!({"metadata": {}})).unwrap();
        assert_eq!(response.suggested_fee_value().unwrap(), None);

        let response: MetadataResponse =
            serde_json::from_value(json!({"metadata": {}, "suggested_fee": []})).unwrap();
        assert_eq!(response.suggested_fee_value().unwrap(), None);
    }
}
