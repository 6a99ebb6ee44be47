//! The signing capability consumed by the transaction pipeline.
//!
//! Signing and key derivation are external collaborators to the
//! construction protocol: the pipeline only needs something that can turn
//! a signing payload into a combine-ready signature, plus the addresses
//! the keys control. Implementations are injected, never inherited.

use rosetta_core::{PublicKey, Result, Signature, SigningPayload};

/// Capability to sign Rosetta construction payloads
pub trait TransactionSigner: Send + Sync {
    /// Payment address controlled by the signing key
    fn address(&self) -> &str;

    /// Reward (stake) address, when the signer holds a stake key
    fn stake_address(&self) -> Option<&str>;

    /// Payment verification key in combine wire format
    fn public_key(&self) -> PublicKey;

    /// Stake verification key, used as the staking credential in
    /// certificate operations
    fn staking_credential(&self) -> Option<PublicKey>;

    /// Signs one payload, returning the signature shape expected by
    /// `/construction/combine`
    fn sign(&self, payload: &SigningPayload) -> Result<Signature>;
}
