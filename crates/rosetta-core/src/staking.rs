//! Stake-key operation construction.
//!
//! Stake key registration, deregistration and pool delegation travel through
//! the same construction pipeline as value transfers: they are appended to
//! the operation list after the output operations, keeping indices
//! contiguous. Registration locks a 2 ADA deposit that deregistration
//! refunds, which callers must account for when drafting outputs.

use serde_json::{json, Value};

use crate::types::{AccountIdentifier, Operation, OperationIdentifier, PublicKey};

/// Deposit locked by stake key registration, refunded on deregistration
pub const STAKE_KEY_DEPOSIT: u64 = 2_000_000;

/// The certificate kinds supported by the construction API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StakeOperationKind {
    /// Register the stake key (locks [`STAKE_KEY_DEPOSIT`])
    Registration,
    /// Deregister the stake key (refunds the deposit)
    Deregistration,
    /// Delegate the registered stake key to a pool
    Delegation {
        /// Hex-encoded hash of the target pool's cold key
        pool_key_hash: String,
    },
}

impl StakeOperationKind {
    fn op_type(&self) -> &'static str {
        match self {
            StakeOperationKind::Registration => "stakeKeyRegistration",
            StakeOperationKind::Deregistration => "stakeKeyDeregistration",
            StakeOperationKind::Delegation { .. } => "stakeDelegation",
        }
    }
}

/// Appends stake operations for `stake_address` starting at `start_index`.
///
/// `staking_credential` is the stake verification key the certificates
/// commit to. The returned operations carry no amount; the deposit is
/// reflected in the transaction's input/output balance instead.
pub fn build_stake_operations(
    stake_address: &str,
    staking_credential: &PublicKey,
    kinds: &[StakeOperationKind],
    start_index: u64,
) -> Vec<Operation> {
    kinds
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let mut metadata = json!({
                "staking_credential": {
                    "hex_bytes": staking_credential.hex_bytes,
                    "curve_type": staking_credential.curve_type,
                }
            });
            if let StakeOperationKind::Delegation { pool_key_hash } = kind {
                metadata["pool_key_hash"] = Value::String(pool_key_hash.clone());
            }

            Operation {
                operation_identifier: OperationIdentifier {
                    index: start_index + i as u64,
                },
                op_type: kind.op_type().to_string(),
                status: String::new(),
                account: AccountIdentifier {
                    address: stake_address.to_string(),
                },
                amount: None,
                coin_change: None,
                metadata,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> PublicKey {
        PublicKey {
            hex_bytes: "aa".repeat(32),
            curve_type: "edwards25519".to_string(),
        }
    }

    #[test]
    fn test_registration_shape() {
        let ops = build_stake_operations(
            "stake_test1xyz",
            &credential(),
            &[StakeOperationKind::Registration],
            3,
        );
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].operation_identifier.index, 3);
        assert_eq!(ops[0].op_type, "stakeKeyRegistration");
        assert_eq!(ops[0].account.address, "stake_test1xyz");
        assert!(ops[0].amount.is_none());
        assert_eq!(
            ops[0].metadata["staking_credential"]["curve_type"],
            "edwards25519"
        );
    }

    #[test]
    fn test_delegation_carries_pool_hash() {
        let ops = build_stake_operations(
            "stake_test1xyz",
            &credential(),
            &[StakeOperationKind::Delegation {
                pool_key_hash: "pool_hash_hex".into(),
            }],
            0,
        );
        assert_eq!(ops[0].op_type, "stakeDelegation");
        assert_eq!(ops[0].metadata["pool_key_hash"], "pool_hash_hex");
    }

    #[test]
    fn test_combined_registration_and_delegation_indices() {
        let ops = build_stake_operations(
            "stake_test1xyz",
            &credential(),
            &[
                StakeOperationKind::Registration,
                StakeOperationKind::Delegation {
                    pool_key_hash: "pool".into(),
                },
            ],
            2,
        );
        assert_eq!(ops[0].operation_identifier.index, 2);
        assert_eq!(ops[1].operation_identifier.index, 3);
    }

    #[test]
    fn test_deposit_constant() {
        assert_eq!(STAKE_KEY_DEPOSIT, 2_000_000);
    }
}
