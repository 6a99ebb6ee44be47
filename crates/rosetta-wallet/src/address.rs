//! Shelley address construction for the test wallet.
//!
//! Addresses are a one-byte header (address kind in the high nibble,
//! network id in the low nibble) followed by blake2b-224 key hashes,
//! bech32-encoded with a network-dependent prefix.

use bech32::{Bech32, Hrp};
use blake2::digest::consts::U28;
use blake2::{Blake2b, Digest};

use crate::error::WalletError;

/// Mainnet network id nibble
pub const MAINNET_NETWORK_ID: u8 = 1;
/// Testnet (Preview/Preprod) network id nibble
pub const TESTNET_NETWORK_ID: u8 = 0;

/// Hashes an Ed25519 public key with Blake2b-224
pub fn key_hash(pubkey: &[u8]) -> [u8; 28] {
    let mut hasher = Blake2b::<U28>::new();
    hasher.update(pubkey);
    let mut hash = [0u8; 28];
    hash.copy_from_slice(&hasher.finalize());
    hash
}

fn encode(hrp: &str, data: &[u8]) -> Result<String, WalletError> {
    let hrp = Hrp::parse(hrp).map_err(|e| WalletError::Address(e.to_string()))?;
    bech32::encode::<Bech32>(hrp, data).map_err(|e| WalletError::Address(e.to_string()))
}

fn payment_hrp(network_id: u8) -> &'static str {
    if network_id == MAINNET_NETWORK_ID {
        "addr"
    } else {
        "addr_test"
    }
}

fn reward_hrp(network_id: u8) -> &'static str {
    if network_id == MAINNET_NETWORK_ID {
        "stake"
    } else {
        "stake_test"
    }
}

/// Enterprise address: payment credential only, no staking rights.
/// Header nibble 0110.
pub fn enterprise_address(payment_pubkey: &[u8], network_id: u8) -> Result<String, WalletError> {
    let header = 0x60 | (network_id & 0x0F);
    let mut data = Vec::with_capacity(29);
    data.push(header);
    data.extend_from_slice(&key_hash(payment_pubkey));
    encode(payment_hrp(network_id), &data)
}

/// Base address: payment plus staking credential. Header nibble 0000.
pub fn base_address(
    payment_pubkey: &[u8],
    stake_pubkey: &[u8],
    network_id: u8,
) -> Result<String, WalletError> {
    let header = network_id & 0x0F;
    let mut data = Vec::with_capacity(57);
    data.push(header);
    data.extend_from_slice(&key_hash(payment_pubkey));
    data.extend_from_slice(&key_hash(stake_pubkey));
    encode(payment_hrp(network_id), &data)
}

/// Reward (stake) address: staking credential only. Header nibble 1110.
pub fn reward_address(stake_pubkey: &[u8], network_id: u8) -> Result<String, WalletError> {
    let header = 0xE0 | (network_id & 0x0F);
    let mut data = Vec::with_capacity(29);
    data.push(header);
    data.extend_from_slice(&key_hash(stake_pubkey));
    encode(reward_hrp(network_id), &data)
}

/// Checks that a string is a decodable payment or reward address
pub fn is_valid_address(address: &str) -> bool {
    match bech32::decode(address) {
        Ok((hrp, _)) => matches!(
            hrp.as_str(),
            "addr" | "addr_test" | "stake" | "stake_test"
        ),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pubkey(fill: u8) -> [u8; 32] {
        [fill; 32]
    }

    #[test]
    fn test_key_hash_length() {
        assert_eq!(key_hash(&pubkey(1)).len(), 28);
    }

    #[test]
    fn test_enterprise_prefixes() {
        let mainnet = enterprise_address(&pubkey(1), MAINNET_NETWORK_ID).unwrap();
        assert!(mainnet.starts_with("addr1"));

        let testnet = enterprise_address(&pubkey(1), TESTNET_NETWORK_ID).unwrap();
        assert!(testnet.starts_with("addr_test1"));
    }

    #[test]
    fn test_reward_prefixes() {
        let mainnet = reward_address(&pubkey(2), MAINNET_NETWORK_ID).unwrap();
        assert!(mainnet.starts_with("stake1"));

        let testnet = reward_address(&pubkey(2), TESTNET_NETWORK_ID).unwrap();
        assert!(testnet.starts_with("stake_test1"));
    }

    #[test]
    fn test_base_address_differs_from_enterprise() {
        let enterprise = enterprise_address(&pubkey(1), TESTNET_NETWORK_ID).unwrap();
        let base = base_address(&pubkey(1), &pubkey(2), TESTNET_NETWORK_ID).unwrap();
        assert_ne!(enterprise, base);
        assert!(base.starts_with("addr_test1"));
    }

    #[test]
    fn test_deterministic() {
        let a = enterprise_address(&pubkey(7), TESTNET_NETWORK_ID).unwrap();
        let b = enterprise_address(&pubkey(7), TESTNET_NETWORK_ID).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_validation() {
        let addr = enterprise_address(&pubkey(1), MAINNET_NETWORK_ID).unwrap();
        assert!(is_valid_address(&addr));

        let stake = reward_address(&pubkey(1), TESTNET_NETWORK_ID).unwrap();
        assert!(is_valid_address(&stake));

        assert!(!is_valid_address("not-an-address"));
        assert!(!is_valid_address("btc1qxyz"));
    }
}
