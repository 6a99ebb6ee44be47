//! # Rosetta Gateway
//!
//! Stateless HTTP gateway to a Cardano Rosetta service: one async method
//! per construction/read endpoint, a single authoritative error
//! classification rule (transport failure or 5xx ⇒ network error, 4xx ⇒
//! validation error with the server body attached), and an injectable
//! request observer for diagnostics.
//!
//! The [`RosettaApi`] trait is the seam the rest of the client depends on;
//! [`RosettaGateway`] is its production implementation.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rosetta_core::NetworkIdentifier;
//! use rosetta_gateway::{GatewayConfig, RosettaApi, RosettaGateway};
//!
//! # async fn demo() -> rosetta_core::Result<()> {
//! let config = GatewayConfig::new("http://localhost:8082", NetworkIdentifier::testnet())
//!     .with_timeout(30);
//! let gateway = RosettaGateway::new(config)?;
//!
//! let status = gateway.network_status().await?;
//! println!("tip: {}", status.current_block_identifier.index);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod observer;

pub use api::{
    BalanceResponse, Block, BlockResponse, BlockTransaction, Coin, MetadataResponse,
    NetworkStatusResponse, ParseResponse, RosettaApi,
};
pub use client::RosettaGateway;
pub use config::GatewayConfig;
pub use observer::{RequestLog, RequestObserver, RequestRecord};
