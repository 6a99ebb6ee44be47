//! # Rosetta Orchestrator
//!
//! The transaction pipeline for the Cardano Rosetta test client: drives a
//! drafted transfer through preprocess, metadata, fee reconciliation,
//! payload construction, external signing, combine, submit, and on-chain
//! confirmation.
//!
//! The pipeline is generic over the [`RosettaApi`](rosetta_gateway::RosettaApi)
//! gateway, the [`TransactionSigner`](rosetta_wallet::TransactionSigner)
//! capability, and a [`Clock`], so every stage is testable against
//! in-memory implementations.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rosetta_gateway::{GatewayConfig, RosettaGateway};
//! use rosetta_orchestrator::TransactionPipeline;
//! use rosetta_wallet::{TestWallet, TransactionSigner};
//! use rosetta_core::{NetworkIdentifier, SpendableInput, TxOutput};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = RosettaGateway::new(GatewayConfig::new(
//!     "http://localhost:8082",
//!     NetworkIdentifier::preprod(),
//! ))?;
//! let wallet = TestWallet::testnet()?;
//!
//! let inputs = vec![SpendableInput::new(wallet.address(), 5_000_000, "tx:0")];
//! let outputs = vec![
//!     TxOutput::new("addr_test1receiver", 2_000_000),
//!     TxOutput::new(wallet.address(), 3_000_000), // change
//! ];
//!
//! let pipeline = TransactionPipeline::new(&gateway, &wallet);
//! let confirmation = pipeline.transfer(&inputs, &outputs, 1).await?;
//! println!("confirmed {} with fee {}", confirmation.hash, confirmation.fee);
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod confirm;
pub mod pipeline;

pub use clock::{Clock, SystemClock};
pub use confirm::{await_confirmation, balance_of, validate_onchain, ConfirmationPolicy};
pub use pipeline::{Confirmation, PipelineError, Stage, TransactionPipeline};
