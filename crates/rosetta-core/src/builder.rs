//! Pure construction of Rosetta operation lists from inputs and outputs.
//!
//! Input operations come first, numbered from zero with negated amounts;
//! output operations follow contiguously with positive amounts. The list
//! must be rebuilt from scratch whenever the output set changes (fee
//! reconciliation does this) so that index offsets and amounts never drift.

use serde_json::Value;

use crate::types::{
    AccountIdentifier, Amount, CoinChange, Operation, OperationIdentifier, SpendableInput,
    TxOutput,
};

/// Turns spendable inputs and desired outputs into an ordered operation list.
///
/// Deterministic and side-effect free: calling it twice with the same
/// arguments yields identical lists. Metadata absent on an input or output
/// becomes an empty object on the operation, never an omitted field.
pub fn build_operations(inputs: &[SpendableInput], outputs: &[TxOutput]) -> Vec<Operation> {
    let mut operations = Vec::with_capacity(inputs.len() + outputs.len());

    for (idx, input) in inputs.iter().enumerate() {
        operations.push(Operation {
            operation_identifier: OperationIdentifier { index: idx as u64 },
            op_type: "input".to_string(),
            status: String::new(),
            account: AccountIdentifier {
                address: input.address.clone(),
            },
            // Negative for inputs
            amount: Some(Amount::lovelace(-(input.value as i64))),
            coin_change: Some(CoinChange::spent(input.coin_identifier.clone())),
            metadata: Value::Object(input.metadata.clone()),
        });
    }

    let offset = inputs.len() as u64;
    for (idx, output) in outputs.iter().enumerate() {
        operations.push(Operation {
            operation_identifier: OperationIdentifier {
                index: offset + idx as u64,
            },
            op_type: "output".to_string(),
            status: String::new(),
            account: AccountIdentifier {
                address: output.address.clone(),
            },
            amount: Some(Amount::lovelace(output.value as i64)),
            coin_change: None,
            metadata: Value::Object(output.metadata.clone()),
        });
    }

    operations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SpendableInput;

    fn sample_inputs(values: &[u64]) -> Vec<SpendableInput> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| SpendableInput::new("addr_test1sender", *v, format!("tx{i}:0")))
            .collect()
    }

    fn sample_outputs(values: &[u64]) -> Vec<TxOutput> {
        values
            .iter()
            .map(|v| TxOutput::new("addr_test1receiver", *v))
            .collect()
    }

    #[test]
    fn test_indexing_and_signs() {
        let inputs = sample_inputs(&[5_000_000, 3_000_000]);
        let outputs = sample_outputs(&[2_000_000, 5_820_000]);

        let ops = build_operations(&inputs, &outputs);
        assert_eq!(ops.len(), 4);

        for (i, op) in ops.iter().enumerate() {
            assert_eq!(op.operation_identifier.index, i as u64);
            assert_eq!(op.status, "");
        }

        assert_eq!(ops[0].op_type, "input");
        assert_eq!(ops[0].value().unwrap(), -5_000_000);
        assert_eq!(ops[1].value().unwrap(), -3_000_000);
        assert_eq!(ops[2].op_type, "output");
        assert_eq!(ops[2].value().unwrap(), 2_000_000);
        assert_eq!(ops[3].value().unwrap(), 5_820_000);
    }

    #[test]
    fn test_inputs_carry_coin_change() {
        let inputs = sample_inputs(&[1_000_000]);
        let outputs = sample_outputs(&[900_000]);

        let ops = build_operations(&inputs, &outputs);
        let coin_change = ops[0].coin_change.as_ref().unwrap();
        assert_eq!(coin_change.coin_action, "coin_spent");
        assert_eq!(coin_change.coin_identifier.identifier, "tx0:0");
        assert!(ops[1].coin_change.is_none());
    }

    #[test]
    fn test_metadata_always_present() {
        let inputs = sample_inputs(&[1_000_000]);
        let outputs = sample_outputs(&[900_000]);

        let ops = build_operations(&inputs, &outputs);
        for op in &ops {
            let json = serde_json::to_value(op).unwrap();
            assert_eq!(json["metadata"], serde_json::json!({}));
        }
    }

    #[test]
    fn test_idempotent_rebuild() {
        let inputs = sample_inputs(&[5_000_000]);
        let outputs = sample_outputs(&[2_000_000, 2_820_000]);

        let first = build_operations(&inputs, &outputs);
        let second = build_operations(&inputs, &outputs);
        assert_eq!(first, second);
    }

    #[test]
    fn test_fan_out_and_consolidation_counts() {
        let ops = build_operations(&sample_inputs(&[10_000_000]), &sample_outputs(&[1; 10]));
        assert_eq!(ops.iter().filter(|o| o.op_type == "input").count(), 1);
        assert_eq!(ops.iter().filter(|o| o.op_type == "output").count(), 10);

        let ops = build_operations(&sample_inputs(&[1; 10]), &sample_outputs(&[9_000_000]));
        assert_eq!(ops.iter().filter(|o| o.op_type == "input").count(), 10);
        assert_eq!(ops.iter().filter(|o| o.op_type == "output").count(), 1);
    }
}
