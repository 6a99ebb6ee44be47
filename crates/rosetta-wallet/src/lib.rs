//! # Rosetta Wallet
//!
//! Signing and input selection for the Cardano Rosetta test client.
//!
//! The construction pipeline treats signing as an opaque capability: the
//! [`TransactionSigner`] trait is what gets injected, and [`TestWallet`] is
//! a deliberately simple Ed25519 implementation good enough for test
//! networks. [`UtxoSelector`] picks spendable inputs from an account's coin
//! set under deterministic policies.
//!
//! ## Example
//!
//! ```rust
//! use rosetta_wallet::{TestWallet, TransactionSigner};
//!
//! let wallet = TestWallet::testnet().unwrap();
//! println!("payment address: {}", wallet.address());
//! println!("stake address: {}", wallet.stake_address().unwrap());
//! ```

pub mod address;
pub mod error;
pub mod selector;
pub mod signer;
pub mod wallet;

pub use address::{
    base_address, enterprise_address, is_valid_address, reward_address, MAINNET_NETWORK_ID,
    TESTNET_NETWORK_ID,
};
pub use error::WalletError;
pub use selector::{AssetRequirement, UtxoSelector};
pub use signer::TransactionSigner;
pub use wallet::TestWallet;
