//! Fee reconciliation against a network-suggested fee.
//!
//! The construction metadata stage may return a suggested fee. When it does,
//! the fee is absorbed by the designated change output and the operation list
//! is rebuilt by the caller. The change slot is an explicit index rather than
//! the positional last-output convention, so a caller cannot silently absorb
//! the fee into the wrong output.

use log::debug;

use crate::error::{Error, Result};
use crate::types::{SpendableInput, TxOutput};

/// Sum of input values in lovelace
pub fn total_input(inputs: &[SpendableInput]) -> u64 {
    inputs.iter().map(|i| i.value).sum()
}

/// Sum of output values in lovelace
pub fn total_output(outputs: &[TxOutput]) -> u64 {
    outputs.iter().map(|o| o.value).sum()
}

/// Subtracts `suggested_fee` from the change output at `change_index` and
/// returns the adjusted output list.
///
/// Fails with a validation error when the fee exceeds the total input value,
/// when there is no output to absorb the fee, when `change_index` is out of
/// bounds, or when the change output would not stay strictly positive. Each
/// failure reports the input total, output total and fee for diagnostics.
pub fn reconcile_fee(
    inputs: &[SpendableInput],
    outputs: &[TxOutput],
    suggested_fee: u64,
    change_index: usize,
) -> Result<Vec<TxOutput>> {
    let input_total = total_input(inputs);
    let output_total = total_output(outputs);

    if suggested_fee > input_total {
        return Err(Error::validation(format!(
            "fee is greater than the total input: inputs={input_total}, \
             outputs={output_total}, fee={suggested_fee}"
        )));
    }

    if outputs.is_empty() {
        // The draft must carry a change slot before a fee can be absorbed.
        return Err(Error::validation(format!(
            "no output available to absorb the fee: inputs={input_total}, fee={suggested_fee}"
        )));
    }

    let Some(change) = outputs.get(change_index) else {
        return Err(Error::validation(format!(
            "change output index {change_index} out of bounds for {} outputs",
            outputs.len()
        )));
    };

    if change.value <= suggested_fee {
        return Err(Error::validation(format!(
            "change output {change_index} cannot absorb the fee: change={}, \
             fee={suggested_fee}",
            change.value
        )));
    }

    let mut adjusted = outputs.to_vec();
    adjusted[change_index].value -= suggested_fee;

    debug!(
        "reconciled fee {} into output {}: {} -> {}",
        suggested_fee, change_index, change.value, adjusted[change_index].value
    );
    Ok(adjusted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(values: &[u64]) -> Vec<SpendableInput> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| SpendableInput::new("addr_test1sender", *v, format!("tx{i}:0")))
            .collect()
    }

    fn outputs(values: &[u64]) -> Vec<TxOutput> {
        values
            .iter()
            .map(|v| TxOutput::new("addr_test1receiver", *v))
            .collect()
    }

    #[test]
    fn test_fee_conservation() {
        let ins = inputs(&[5_000_000]);
        let outs = outputs(&[2_000_000, 3_000_000]);

        let adjusted = reconcile_fee(&ins, &outs, 180_000, 1).unwrap();
        assert_eq!(adjusted[0].value, 2_000_000);
        assert_eq!(adjusted[1].value, 2_820_000);
        assert_eq!(
            total_input(&ins) - total_output(&adjusted),
            180_000,
            "inputs minus outputs must equal the fee"
        );
    }

    #[test]
    fn test_fee_exceeding_inputs_fails() {
        let ins = inputs(&[100_000]);
        let outs = outputs(&[50_000]);

        let err = reconcile_fee(&ins, &outs, 200_000, 0).unwrap_err();
        assert!(err.is_validation());
        let msg = err.to_string();
        assert!(msg.contains("inputs=100000"));
        assert!(msg.contains("fee=200000"));
    }

    #[test]
    fn test_empty_outputs_fail_instead_of_no_op() {
        let ins = inputs(&[1_000_000]);
        let err = reconcile_fee(&ins, &[], 180_000, 0).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_change_index_out_of_bounds() {
        let ins = inputs(&[1_000_000]);
        let outs = outputs(&[900_000]);
        let err = reconcile_fee(&ins, &outs, 100_000, 3).unwrap_err();
        assert!(err.to_string().contains("out of bounds"));
    }

    #[test]
    fn test_change_must_stay_positive() {
        let ins = inputs(&[1_000_000]);
        let outs = outputs(&[800_000, 180_000]);
        // 180_000 - 180_000 would leave a zero-value output
        let err = reconcile_fee(&ins, &outs, 180_000, 1).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("cannot absorb"));
    }

    #[test]
    fn test_original_outputs_untouched() {
        let ins = inputs(&[5_000_000]);
        let outs = outputs(&[2_000_000, 3_000_000]);
        let _ = reconcile_fee(&ins, &outs, 180_000, 1).unwrap();
        assert_eq!(outs[1].value, 3_000_000);
    }
}
