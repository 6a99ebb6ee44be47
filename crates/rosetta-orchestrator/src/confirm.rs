//! On-chain confirmation: bounded polling plus post-hoc validation.
//!
//! After submission the pipeline polls the chain tip until the transaction
//! hash appears in the current block, then fetches the block-transaction
//! detail and checks it against the operations that were originally built.
//! The poll is bounded: exhausting the deadline is reported as a
//! confirmation timeout, a condition distinct from both validation and
//! network errors.

use std::collections::BTreeMap;
use std::time::Duration;

use log::{debug, info};

use rosetta_core::{BlockIdentifier, Error, Operation, Result};
use rosetta_gateway::{BlockTransaction, RosettaApi};

use crate::clock::Clock;

/// Poll cadence and deadline for the confirmation loop
#[derive(Debug, Clone)]
pub struct ConfirmationPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            timeout: Duration::from_secs(180),
        }
    }
}

/// Polls the chain tip until `tx_hash` appears in a block.
///
/// Each round queries `/network/status` for the current block and scans its
/// transaction list. A block that is not yet available (the node may still
/// be serving a stale tip) is skipped and retried; genuine gateway failures
/// propagate. Returns the containing block and the on-chain transaction
/// detail.
pub async fn await_confirmation<A: RosettaApi, C: Clock>(
    api: &A,
    clock: &C,
    policy: &ConfirmationPolicy,
    tx_hash: &str,
) -> Result<(BlockIdentifier, BlockTransaction)> {
    let deadline = clock.now_millis() + policy.timeout.as_millis() as u64;

    while clock.now_millis() < deadline {
        let status = api.network_status().await?;
        let tip = status.current_block_identifier;

        let block = api.get_block(&tip).await?.block;
        let found = block
            .as_ref()
            .map(|b| {
                b.transactions
                    .iter()
                    .any(|tx| tx.transaction_identifier.hash == tx_hash)
            })
            .unwrap_or(false);

        if found {
            info!("transaction {tx_hash} found in block {}", tip.index);
            let detail = api.get_block_transaction(&tip, tx_hash).await?;
            return Ok((tip, detail));
        }

        debug!(
            "transaction {tx_hash} not in block {}, polling again in {:?}",
            tip.index, policy.poll_interval
        );
        clock.sleep(policy.poll_interval).await;
    }

    Err(Error::ConfirmationTimeout {
        hash: tx_hash.to_string(),
        waited_secs: policy.timeout.as_secs(),
    })
}

/// Validates the on-chain transaction against the operations submitted.
///
/// Checks operation count, per-operation address/amount equality (inputs
/// additionally by coin reference), and that the fee recomputed from
/// on-chain amounts equals the fee implied by the submitted operations.
/// The chain may reorder operations, so inputs are matched by coin
/// reference and outputs by (address, amount) multiset.
pub fn validate_onchain(expected: &[Operation], onchain: &BlockTransaction) -> Result<()> {
    let onchain_ops = &onchain.operations;
    if onchain_ops.len() != expected.len() {
        return Err(Error::validation(format!(
            "operation count mismatch: expected {}, got {} on-chain",
            expected.len(),
            onchain_ops.len()
        )));
    }

    // Inputs matched by coin reference
    let expected_inputs = inputs_by_coin(expected)?;
    let onchain_inputs = inputs_by_coin(onchain_ops)?;
    if expected_inputs != onchain_inputs {
        return Err(Error::validation(format!(
            "input operations differ on-chain: expected {expected_inputs:?}, got {onchain_inputs:?}"
        )));
    }

    // Outputs matched as an (address, amount) multiset
    let expected_outputs = output_multiset(expected)?;
    let onchain_outputs = output_multiset(onchain_ops)?;
    if expected_outputs != onchain_outputs {
        return Err(Error::validation(format!(
            "output operations differ on-chain: expected {expected_outputs:?}, got {onchain_outputs:?}"
        )));
    }

    let expected_fee = balance_of(expected)?;
    let onchain_fee = balance_of(onchain_ops)?;
    if expected_fee != onchain_fee {
        return Err(Error::validation(format!(
            "fee mismatch: expected {expected_fee}, got {onchain_fee} on-chain"
        )));
    }

    Ok(())
}

/// Sum of input magnitudes minus sum of outputs, i.e. what the ledger kept
pub fn balance_of(operations: &[Operation]) -> Result<i64> {
    let mut balance = 0i64;
    for op in operations {
        match op.op_type.as_str() {
            "input" => balance += op.value()?.abs(),
            "output" => balance -= op.value()?,
            _ => {}
        }
    }
    Ok(balance)
}

fn inputs_by_coin(operations: &[Operation]) -> Result<BTreeMap<String, (String, i64)>> {
    let mut map = BTreeMap::new();
    for op in operations.iter().filter(|op| op.op_type == "input") {
        let coin = op
            .coin_change
            .as_ref()
            .map(|c| c.coin_identifier.identifier.clone())
            .ok_or_else(|| {
                Error::validation(format!(
                    "input operation {} lacks a coin reference",
                    op.operation_identifier.index
                ))
            })?;
        map.insert(coin, (op.account.address.clone(), op.value()?));
    }
    Ok(map)
}

fn output_multiset(operations: &[Operation]) -> Result<BTreeMap<(String, i64), usize>> {
    let mut map = BTreeMap::new();
    for op in operations.iter().filter(|op| op.op_type == "output") {
        *map.entry((op.account.address.clone(), op.value()?))
            .or_insert(0) += 1;
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosetta_core::{build_operations, SpendableInput, TransactionIdentifier, TxOutput};

    fn built_ops() -> Vec<Operation> {
        let inputs = vec![SpendableInput::new("addr_test1sender", 5_000_000, "tx:0")];
        let outputs = vec![
            TxOutput::new("addr_test1receiver", 2_000_000),
            TxOutput::new("addr_test1sender", 2_820_000),
        ];
        build_operations(&inputs, &outputs)
    }

    fn as_block_tx(operations: Vec<Operation>) -> BlockTransaction {
        BlockTransaction {
            transaction_identifier: TransactionIdentifier {
                hash: "tx123".into(),
            },
            operations,
        }
    }

    #[test]
    fn test_validates_identical_operations() {
        let ops = built_ops();
        validate_onchain(&ops, &as_block_tx(ops.clone())).unwrap();
    }

    #[test]
    fn test_tolerates_reordered_outputs() {
        let ops = built_ops();
        let mut reordered = ops.clone();
        reordered.swap(1, 2);
        validate_onchain(&ops, &as_block_tx(reordered)).unwrap();
    }

    #[test]
    fn test_detects_count_mismatch() {
        let ops = built_ops();
        let mut truncated = ops.clone();
        truncated.pop();
        let err = validate_onchain(&ops, &as_block_tx(truncated)).unwrap_err();
        assert!(err.to_string().contains("count mismatch"));
    }

    #[test]
    fn test_detects_amount_drift() {
        let ops = built_ops();
        let mut tampered = ops.clone();
        tampered[2].amount = Some(rosetta_core::Amount::lovelace(2_819_999));
        let err = validate_onchain(&ops, &as_block_tx(tampered)).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_detects_coin_reference_swap() {
        let ops = built_ops();
        let mut tampered = ops.clone();
        tampered[0].coin_change = Some(rosetta_core::CoinChange::spent("other:9"));
        let err = validate_onchain(&ops, &as_block_tx(tampered)).unwrap_err();
        assert!(err.to_string().contains("input operations differ"));
    }

    #[test]
    fn test_balance_is_fee() {
        let ops = built_ops();
        assert_eq!(balance_of(&ops).unwrap(), 180_000);
    }
}
