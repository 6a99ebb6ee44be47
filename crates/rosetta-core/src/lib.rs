//! # Rosetta Core
//!
//! Data model and pure construction logic for the Cardano Rosetta test
//! client. This crate performs no I/O: it defines the wire types the
//! construction endpoints exchange, builds operation lists from spendable
//! inputs and outputs, and reconciles network-suggested fees into the
//! designated change output.
//!
//! ## Example
//!
//! ```rust
//! use rosetta_core::{build_operations, reconcile_fee, SpendableInput, TxOutput};
//!
//! let inputs = vec![SpendableInput::new("addr_test1sender", 5_000_000, "tx:0")];
//! let outputs = vec![
//!     TxOutput::new("addr_test1receiver", 2_000_000),
//!     TxOutput::new("addr_test1sender", 3_000_000), // change
//! ];
//!
//! let adjusted = reconcile_fee(&inputs, &outputs, 180_000, 1).unwrap();
//! let operations = build_operations(&inputs, &adjusted);
//! assert_eq!(operations.len(), 3);
//! ```
//!
//! ## Invariants
//!
//! - Operation indices are contiguous and unique: inputs first from zero,
//!   outputs following, stake operations (if any) after those.
//! - The sum of input amounts minus the sum of output amounts equals the
//!   fee and is never negative.
//! - Every output stays strictly positive after fee adjustment; a change
//!   output that cannot absorb the fee is a hard failure, not a clamp.

pub mod builder;
pub mod error;
pub mod fee;
pub mod staking;
pub mod types;

pub use builder::build_operations;
pub use error::{Error, Result};
pub use fee::{reconcile_fee, total_input, total_output};
pub use staking::{build_stake_operations, StakeOperationKind, STAKE_KEY_DEPOSIT};
pub use types::{
    AccountIdentifier, Amount, Asset, BlockIdentifier, CoinChange, CoinIdentifier,
    ConstructedTransaction, Currency, NetworkIdentifier, Operation, OperationIdentifier,
    PublicKey, Signature, SigningPayload, SpendableInput, TransactionIdentifier, TxOutput,
    LOVELACE_PER_ADA,
};
