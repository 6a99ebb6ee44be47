//! The HTTP gateway to a Cardano Rosetta service.
//!
//! All endpoints are POST with a JSON body carrying the session's fixed
//! network identifier. Error classification is uniform across every call:
//! transport failures and HTTP 5xx become [`Error::Network`], HTTP 4xx
//! becomes [`Error::Validation`] with the parsed server error body attached
//! when the body is JSON. No endpoint applies its own policy.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::{debug, error};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use rosetta_core::{
    BlockIdentifier, ConstructedTransaction, Error, Operation, Result, Signature,
    TransactionIdentifier,
};

use crate::api::{
    BalanceResponse, BlockResponse, BlockTransaction, Coin, MetadataResponse,
    NetworkStatusResponse, ParseResponse, RosettaApi,
};
use crate::config::GatewayConfig;
use crate::observer::{body_preview, RequestObserver, RequestRecord};

/// Stateless client for the Rosetta construction and read endpoints.
///
/// The gateway holds no mutable session state beyond the passive request
/// counter, so a single instance can be shared by concurrent callers.
pub struct RosettaGateway {
    config: GatewayConfig,
    http: reqwest::Client,
    observer: Option<Arc<dyn RequestObserver>>,
    request_id: AtomicU64,
}

impl RosettaGateway {
    /// Creates a gateway for the configured endpoint
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            http,
            observer: None,
            request_id: AtomicU64::new(1),
        })
    }

    /// Attaches a request observer. Diagnostics only; the gateway never
    /// reads the observer back.
    pub fn with_observer(mut self, observer: Arc<dyn RequestObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The configured endpoint base URL
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn network_identifier(&self) -> Value {
        serde_json::to_value(&self.config.network).expect("network identifier serializes")
    }

    fn observe(&self, endpoint: &str, status: Option<u16>, started: Instant, body: &str) {
        if let Some(observer) = &self.observer {
            observer.on_request(&RequestRecord {
                id: self.request_id.fetch_add(1, Ordering::SeqCst),
                endpoint: endpoint.to_string(),
                status,
                duration_ms: started.elapsed().as_millis() as u64,
                body_preview: body_preview(body),
            });
        }
    }

    /// Issues one POST and applies the classification rule.
    async fn post<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T> {
        let url = format!("{}{}", self.config.endpoint, path);
        debug!("POST {url}");
        let started = Instant::now();

        let response = match self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                self.observe(path, None, started, "");
                error!("request to {path} failed: {e}");
                return Err(Error::network(format!("request to {path} failed: {e}")));
            }
        };

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::network(format!("failed to read {path} response: {e}")))?;
        self.observe(path, Some(status.as_u16()), started, &text);

        if status.is_success() {
            serde_json::from_str(&text).map_err(|e| {
                Error::network(format!("malformed response body from {path}: {e}"))
            })
        } else if status.is_client_error() {
            error!("{path} rejected with HTTP {status}: {}", body_preview(&text));
            Err(Error::Validation {
                message: format!("{path} rejected with HTTP {}", status.as_u16()),
                details: serde_json::from_str(&text).ok(),
            })
        } else {
            error!("{path} failed with HTTP {status}");
            Err(Error::network(format!(
                "{path} failed with HTTP {}",
                status.as_u16()
            )))
        }
    }
}

#[async_trait]
impl RosettaApi for RosettaGateway {
    async fn network_status(&self) -> Result<NetworkStatusResponse> {
        self.post(
            "/network/status",
            json!({
                "network_identifier": self.network_identifier(),
                "metadata": {},
            }),
        )
        .await
    }

    async fn get_balance(&self, address: &str) -> Result<BalanceResponse> {
        self.post(
            "/account/balance",
            json!({
                "network_identifier": self.network_identifier(),
                "account_identifier": {"address": address},
            }),
        )
        .await
    }

    async fn get_utxos(&self, address: &str) -> Result<Vec<Coin>> {
        #[derive(serde::Deserialize)]
        struct CoinsResponse {
            #[serde(default)]
            coins: Vec<Coin>,
        }

        let response: CoinsResponse = self
            .post(
                "/account/coins",
                json!({
                    "network_identifier": self.network_identifier(),
                    "account_identifier": {"address": address},
                    "include_mempool": true,
                }),
            )
            .await?;
        Ok(response.coins)
    }

    async fn preprocess(&self, operations: &[Operation]) -> Result<Value> {
        #[derive(serde::Deserialize)]
        struct PreprocessResponse {
            options: Value,
        }

        let response: PreprocessResponse = self
            .post(
                "/construction/preprocess",
                json!({
                    "network_identifier": self.network_identifier(),
                    "operations": operations,
                    "metadata": {},
                }),
            )
            .await?;
        Ok(response.options)
    }

    async fn fetch_metadata(&self, options: &Value) -> Result<MetadataResponse> {
        self.post(
            "/construction/metadata",
            json!({
                "network_identifier": self.network_identifier(),
                "options": options,
                "public_keys": [],
            }),
        )
        .await
    }

    async fn create_payloads(
        &self,
        operations: &[Operation],
        metadata: &Value,
    ) -> Result<ConstructedTransaction> {
        self.post(
            "/construction/payloads",
            json!({
                "network_identifier": self.network_identifier(),
                "operations": operations,
                "metadata": metadata,
            }),
        )
        .await
    }

    async fn combine(
        &self,
        unsigned_transaction: &str,
        signatures: &[Signature],
    ) -> Result<String> {
        #[derive(serde::Deserialize)]
        struct CombineResponse {
            signed_transaction: String,
        }

        let response: CombineResponse = self
            .post(
                "/construction/combine",
                json!({
                    "network_identifier": self.network_identifier(),
                    "unsigned_transaction": unsigned_transaction,
                    "signatures": signatures,
                }),
            )
            .await?;
        Ok(response.signed_transaction)
    }

    async fn submit(&self, signed_transaction: &str) -> Result<TransactionIdentifier> {
        #[derive(serde::Deserialize)]
        struct SubmitResponse {
            transaction_identifier: TransactionIdentifier,
        }

        let response: SubmitResponse = self
            .post(
                "/construction/submit",
                json!({
                    "network_identifier": self.network_identifier(),
                    "signed_transaction": signed_transaction,
                }),
            )
            .await?;
        Ok(response.transaction_identifier)
    }

    async fn get_transaction_hash(
        &self,
        signed_transaction: &str,
    ) -> Result<TransactionIdentifier> {
        #[derive(serde::Deserialize)]
        struct HashResponse {
            transaction_identifier: TransactionIdentifier,
        }

        let response: HashResponse = self
            .post(
                "/construction/hash",
                json!({
                    "network_identifier": self.network_identifier(),
                    "signed_transaction": signed_transaction,
                }),
            )
            .await?;
        Ok(response.transaction_identifier)
    }

    async fn parse(&self, transaction_hex: &str, signed: bool) -> Result<ParseResponse> {
        self.post(
            "/construction/parse",
            json!({
                "network_identifier": self.network_identifier(),
                "signed": signed,
                "transaction": transaction_hex,
            }),
        )
        .await
    }

    async fn get_block(&self, block: &BlockIdentifier) -> Result<BlockResponse> {
        self.post(
            "/block",
            json!({
                "network_identifier": self.network_identifier(),
                "block_identifier": block,
            }),
        )
        .await
    }

    async fn get_block_transaction(
        &self,
        block: &BlockIdentifier,
        tx_hash: &str,
    ) -> Result<BlockTransaction> {
        #[derive(serde::Deserialize)]
        struct BlockTransactionResponse {
            transaction: BlockTransaction,
        }

        let response: BlockTransactionResponse = self
            .post(
                "/block/transaction",
                json!({
                    "network_identifier": self.network_identifier(),
                    "block_identifier": block,
                    "transaction_identifier": {"hash": tx_hash},
                }),
            )
            .await?;
        Ok(response.transaction)
    }
}

impl std::fmt::Debug for RosettaGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosettaGateway")
            .field("endpoint", &self.config.endpoint)
            .field("network", &self.config.network)
            .finish()
    }
}
