//! Ed25519 test wallet.
//!
//! A deliberately simple signer for driving the construction pipeline on
//! test networks: payment and stake keys come straight from the BIP-39
//! seed rather than full CIP-1852 derivation, which is enough for a wallet
//! that only ever talks to itself.

use bip39::Mnemonic;
use ed25519_dalek::{Signer as _, SigningKey, VerifyingKey, SECRET_KEY_LENGTH};
use rand::RngCore;
use std::str::FromStr;

use rosetta_core::{PublicKey, Result, Signature, SigningPayload};

use crate::address::{
    base_address, reward_address, MAINNET_NETWORK_ID, TESTNET_NETWORK_ID,
};
use crate::error::WalletError;
use crate::signer::TransactionSigner;

/// Test wallet holding a payment key and a stake key
pub struct TestWallet {
    payment_key: SigningKey,
    payment_vkey: VerifyingKey,
    stake_key: SigningKey,
    stake_vkey: VerifyingKey,
    network_id: u8,
    address: String,
    stake_addr: String,
}

impl TestWallet {
    fn from_key_bytes(
        payment_bytes: [u8; SECRET_KEY_LENGTH],
        stake_bytes: [u8; SECRET_KEY_LENGTH],
        network_id: u8,
    ) -> std::result::Result<Self, WalletError> {
        let payment_key = SigningKey::from_bytes(&payment_bytes);
        let payment_vkey = payment_key.verifying_key();
        let stake_key = SigningKey::from_bytes(&stake_bytes);
        let stake_vkey = stake_key.verifying_key();

        let address = base_address(
            payment_vkey.as_bytes(),
            stake_vkey.as_bytes(),
            network_id,
        )?;
        let stake_addr = reward_address(stake_vkey.as_bytes(), network_id)?;

        Ok(Self {
            payment_key,
            payment_vkey,
            stake_key,
            stake_vkey,
            network_id,
            address,
            stake_addr,
        })
    }

    /// Creates a wallet with random keys
    pub fn random(network_id: u8) -> std::result::Result<Self, WalletError> {
        let mut csprng = rand::rngs::OsRng;
        let mut payment_bytes = [0u8; SECRET_KEY_LENGTH];
        let mut stake_bytes = [0u8; SECRET_KEY_LENGTH];
        csprng.fill_bytes(&mut payment_bytes);
        csprng.fill_bytes(&mut stake_bytes);
        Self::from_key_bytes(payment_bytes, stake_bytes, network_id)
    }

    /// Random wallet on testnet
    pub fn testnet() -> std::result::Result<Self, WalletError> {
        Self::random(TESTNET_NETWORK_ID)
    }

    /// Random wallet on mainnet
    pub fn mainnet() -> std::result::Result<Self, WalletError> {
        Self::random(MAINNET_NETWORK_ID)
    }

    /// Creates a wallet from a mnemonic phrase.
    ///
    /// The payment key takes the first 32 seed bytes and the stake key the
    /// next 32, so the same phrase always yields the same pair of addresses.
    pub fn from_mnemonic(
        mnemonic: &str,
        network_id: u8,
    ) -> std::result::Result<Self, WalletError> {
        let mnemonic = Mnemonic::from_str(mnemonic)
            .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
        let seed = mnemonic.to_seed("");

        let mut payment_bytes = [0u8; SECRET_KEY_LENGTH];
        payment_bytes.copy_from_slice(&seed[..SECRET_KEY_LENGTH]);
        let mut stake_bytes = [0u8; SECRET_KEY_LENGTH];
        stake_bytes.copy_from_slice(&seed[SECRET_KEY_LENGTH..2 * SECRET_KEY_LENGTH]);

        Self::from_key_bytes(payment_bytes, stake_bytes, network_id)
    }

    /// Network id nibble used for the wallet's addresses
    pub fn network_id(&self) -> u8 {
        self.network_id
    }

    /// Payment verification key as hex
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.payment_vkey.as_bytes())
    }
}

impl TransactionSigner for TestWallet {
    fn address(&self) -> &str {
        &self.address
    }

    fn stake_address(&self) -> Option<&str> {
        Some(&self.stake_addr)
    }

    fn public_key(&self) -> PublicKey {
        PublicKey {
            hex_bytes: hex::encode(self.payment_vkey.as_bytes()),
            curve_type: "edwards25519".to_string(),
        }
    }

    fn staking_credential(&self) -> Option<PublicKey> {
        Some(PublicKey {
            hex_bytes: hex::encode(self.stake_vkey.as_bytes()),
            curve_type: "edwards25519".to_string(),
        })
    }

    fn sign(&self, payload: &SigningPayload) -> Result<Signature> {
        let message = hex::decode(&payload.hex_bytes)
            .map_err(|e| WalletError::Signing(format!("payload is not hex: {e}")))?;

        // Stake certificate payloads are addressed to the reward address
        // and must be signed with the stake key.
        let payload_address = payload
            .address
            .as_deref()
            .or(payload.account_identifier.as_ref().map(|a| a.address.as_str()));
        let (key, vkey) = if payload_address == Some(self.stake_addr.as_str()) {
            (&self.stake_key, &self.stake_vkey)
        } else {
            (&self.payment_key, &self.payment_vkey)
        };

        let signature = key.sign(&message);

        Ok(Signature {
            signing_payload: payload.clone(),
            public_key: PublicKey {
                hex_bytes: hex::encode(vkey.as_bytes()),
                curve_type: "edwards25519".to_string(),
            },
            signature_type: "ed25519".to_string(),
            hex_bytes: hex::encode(signature.to_bytes()),
        })
    }
}
