use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Lovelace is the smallest unit (1 ADA = 1,000,000 Lovelace)
pub const LOVELACE_PER_ADA: u64 = 1_000_000;

/// Identifies the blockchain and network for every request in a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkIdentifier {
    pub blockchain: String,
    pub network: String,
}

impl NetworkIdentifier {
    /// Cardano network identifier with the given network name
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            blockchain: "cardano".to_string(),
            network: network.into(),
        }
    }

    /// Cardano mainnet
    pub fn mainnet() -> Self {
        Self::new("mainnet")
    }

    /// Cardano testnet (Preview)
    pub fn testnet() -> Self {
        Self::new("testnet")
    }

    /// Cardano Preprod testnet
    pub fn preprod() -> Self {
        Self::new("preprod")
    }
}

/// Currency descriptor attached to every amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub symbol: String,
    pub decimals: u8,
}

impl Currency {
    /// The native asset: ADA with 6 decimal places
    pub fn ada() -> Self {
        Self {
            symbol: "ADA".to_string(),
            decimals: 6,
        }
    }
}

/// Rosetta amount. Values travel as strings on the wire and are signed:
/// negative for inputs, positive for outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub value: String,
    pub currency: Currency,
}

impl Amount {
    /// Builds a native-asset amount from a signed lovelace value
    pub fn lovelace(value: i64) -> Self {
        Self {
            value: value.to_string(),
            currency: Currency::ada(),
        }
    }

    /// Parses the wire value back into a signed integer
    pub fn as_i64(&self) -> Result<i64> {
        self.value
            .parse()
            .map_err(|_| Error::validation(format!("non-integer amount value: {}", self.value)))
    }
}

/// Positional identifier of an operation within a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationIdentifier {
    pub index: u64,
}

/// Account owning an operation's balance change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIdentifier {
    pub address: String,
}

/// Opaque reference pinpointing a specific UTXO on-chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinIdentifier {
    pub identifier: String,
}

/// Marks an input operation as spending its referenced coin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinChange {
    pub coin_identifier: CoinIdentifier,
    pub coin_action: String,
}

impl CoinChange {
    /// A `coin_spent` change for the given coin reference
    pub fn spent(identifier: impl Into<String>) -> Self {
        Self {
            coin_identifier: CoinIdentifier {
                identifier: identifier.into(),
            },
            coin_action: "coin_spent".to_string(),
        }
    }
}

/// One balance-changing effect within a transaction, in the exact shape the
/// Rosetta construction endpoints expect.
///
/// Operations are value objects: whenever the output set changes the whole
/// list is rebuilt, never patched, so indices and amounts stay consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub operation_identifier: OperationIdentifier,
    #[serde(rename = "type")]
    pub op_type: String,
    pub status: String,
    pub account: AccountIdentifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coin_change: Option<CoinChange>,
    pub metadata: Value,
}

impl Operation {
    /// Signed lovelace value of this operation, when it carries an amount
    pub fn value(&self) -> Result<i64> {
        match &self.amount {
            Some(amount) => amount.as_i64(),
            None => Err(Error::validation(format!(
                "operation {} carries no amount",
                self.operation_identifier.index
            ))),
        }
    }
}

/// A native asset attached to a UTXO
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub policy_id: String,
    pub asset_name: String,
    pub amount: u64,
}

/// An unspent transaction output selected to fund a transaction.
///
/// Immutable once selected; callers running concurrent builds must exclude
/// each other's selections to avoid a double-spend race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendableInput {
    /// Owning address
    pub address: String,
    /// Value in lovelace
    pub value: u64,
    /// Coin reference (`{tx_hash}:{index}`)
    pub coin_identifier: String,
    /// Attached native assets, empty for ADA-only UTXOs
    #[serde(default)]
    pub assets: Vec<Asset>,
    /// Extra metadata echoed into the input operation
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl SpendableInput {
    /// An ADA-only input with no extra metadata
    pub fn new(
        address: impl Into<String>,
        value: u64,
        coin_identifier: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            value,
            coin_identifier: coin_identifier.into(),
            assets: Vec::new(),
            metadata: Map::new(),
        }
    }

    /// True when the UTXO carries no native assets
    pub fn is_ada_only(&self) -> bool {
        self.assets.is_empty()
    }
}

/// A transaction output: destination address plus value in lovelace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxOutput {
    pub address: String,
    pub value: u64,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl TxOutput {
    /// Output with no extra metadata
    pub fn new(address: impl Into<String>, value: u64) -> Self {
        Self {
            address: address.into(),
            value,
            metadata: Map::new(),
        }
    }
}

/// Payload produced by `/construction/payloads` that must be signed externally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigningPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_identifier: Option<AccountIdentifier>,
    pub hex_bytes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_type: Option<String>,
}

/// Unsigned transaction encoding plus the payloads that need signatures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructedTransaction {
    pub unsigned_transaction: String,
    pub payloads: Vec<SigningPayload>,
}

/// Public key in the shape `/construction/combine` expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    pub hex_bytes: String,
    pub curve_type: String,
}

/// A signature over one signing payload, ready for `/construction/combine`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub signing_payload: SigningPayload,
    pub public_key: PublicKey,
    pub signature_type: String,
    pub hex_bytes: String,
}

/// Identifies a block by height and hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockIdentifier {
    pub index: u64,
    pub hash: String,
}

/// Identifies a transaction by hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionIdentifier {
    pub hash: String,
}
