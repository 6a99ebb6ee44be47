//! The transaction construction pipeline.
//!
//! One pipeline run drives a single transaction through the construction
//! protocol: build operations, preprocess, fetch metadata, reconcile the
//! suggested fee into the change output, rebuild operations, create
//! payloads, sign externally, combine, submit, then poll for on-chain
//! confirmation and validate what landed. Stages are strictly sequential;
//! a failure at any stage aborts the run with the stage reached, and
//! retrying is the caller's decision since a retry usually needs a fresh
//! UTXO selection.

use std::fmt;

use log::{debug, info};
use thiserror::Error as ThisError;

use rosetta_core::{
    build_operations, build_stake_operations, reconcile_fee, total_input, total_output, Error,
    Operation, Signature, SpendableInput, StakeOperationKind, TxOutput, STAKE_KEY_DEPOSIT,
};
use rosetta_gateway::{BlockTransaction, RosettaApi};
use rosetta_wallet::TransactionSigner;

use crate::clock::{Clock, SystemClock};
use crate::confirm::{await_confirmation, balance_of, validate_onchain, ConfirmationPolicy};

/// Stages of one pipeline run, in order of progression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Drafted,
    Preprocessed,
    MetadataFetched,
    FeeReconciled,
    PayloadsReady,
    Signed,
    Combined,
    Submitted,
    Confirmed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Drafted => "drafted",
            Stage::Preprocessed => "preprocessed",
            Stage::MetadataFetched => "metadata-fetched",
            Stage::FeeReconciled => "fee-reconciled",
            Stage::PayloadsReady => "payloads-ready",
            Stage::Signed => "signed",
            Stage::Combined => "combined",
            Stage::Submitted => "submitted",
            Stage::Confirmed => "confirmed",
        };
        f.write_str(name)
    }
}

/// A pipeline failure, annotated with the last stage that completed
#[derive(Debug, ThisError)]
#[error("pipeline failed after stage '{stage}': {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: Error,
}

fn fail(stage: Stage) -> impl FnOnce(Error) -> PipelineError {
    move |source| PipelineError { stage, source }
}

/// Outcome of a confirmed transaction
#[derive(Debug, Clone)]
pub struct Confirmation {
    /// On-chain transaction hash
    pub hash: String,
    /// Fee paid, in lovelace, net of stake deposits and refunds
    pub fee: u64,
    /// Block the transaction landed in
    pub block: rosetta_core::BlockIdentifier,
    /// Operations as reported on-chain
    pub operations: Vec<Operation>,
}

/// Drives one transaction at a time through construction, signing,
/// submission and confirmation.
///
/// The API and signer are injected capabilities; the clock is swappable so
/// confirmation deadlines are testable without real waiting.
pub struct TransactionPipeline<'a, A, S, C = SystemClock> {
    api: &'a A,
    signer: &'a S,
    clock: C,
    policy: ConfirmationPolicy,
}

impl<'a, A: RosettaApi, S: TransactionSigner> TransactionPipeline<'a, A, S, SystemClock> {
    /// Pipeline with the system clock and default confirmation policy
    pub fn new(api: &'a A, signer: &'a S) -> Self {
        Self {
            api,
            signer,
            clock: SystemClock::new(),
            policy: ConfirmationPolicy::default(),
        }
    }
}

impl<'a, A: RosettaApi, S: TransactionSigner, C: Clock> TransactionPipeline<'a, A, S, C> {
    /// Replaces the clock driving the confirmation poll
    pub fn with_clock<C2: Clock>(self, clock: C2) -> TransactionPipeline<'a, A, S, C2> {
        TransactionPipeline {
            api: self.api,
            signer: self.signer,
            clock,
            policy: self.policy,
        }
    }

    /// Replaces the confirmation poll cadence and deadline
    pub fn with_confirmation_policy(mut self, policy: ConfirmationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Runs a plain value transfer
    pub async fn transfer(
        &self,
        inputs: &[SpendableInput],
        outputs: &[TxOutput],
        change_index: usize,
    ) -> Result<Confirmation, PipelineError> {
        self.run(inputs, outputs, change_index, &[]).await
    }

    /// Runs a transfer carrying stake certificate operations.
    ///
    /// Stake operations are appended after the output operations, keeping
    /// indices contiguous. Registration deposits and deregistration refunds
    /// are accounted for when the paid fee is reported.
    pub async fn run(
        &self,
        inputs: &[SpendableInput],
        outputs: &[TxOutput],
        change_index: usize,
        stake_ops: &[StakeOperationKind],
    ) -> Result<Confirmation, PipelineError> {
        let mut stage = Stage::Drafted;

        let stake_identity = self.stake_identity(stake_ops).map_err(fail(stage))?;
        let build = |outputs: &[TxOutput]| {
            let mut operations = build_operations(inputs, outputs);
            if let Some((stake_address, credential)) = &stake_identity {
                let start = operations.len() as u64;
                operations.extend(build_stake_operations(
                    stake_address,
                    credential,
                    stake_ops,
                    start,
                ));
            }
            operations
        };

        let mut outputs = outputs.to_vec();
        let mut operations = build(&outputs);
        debug!(
            "drafted {} operations ({} inputs, {} outputs, {} certificates)",
            operations.len(),
            inputs.len(),
            outputs.len(),
            stake_ops.len()
        );

        let options = self.api.preprocess(&operations).await.map_err(fail(stage))?;
        stage = Stage::Preprocessed;

        let metadata = self.api.fetch_metadata(&options).await.map_err(fail(stage))?;
        stage = Stage::MetadataFetched;

        if let Some(fee) = metadata.suggested_fee_value().map_err(fail(stage))? {
            outputs = reconcile_fee(inputs, &outputs, fee, change_index).map_err(fail(stage))?;
            operations = build(&outputs);
            debug!("absorbed suggested fee of {fee} lovelace into output {change_index}");
        }
        stage = Stage::FeeReconciled;

        let constructed = self
            .api
            .create_payloads(&operations, &metadata.metadata)
            .await
            .map_err(fail(stage))?;
        stage = Stage::PayloadsReady;

        let signatures = self
            .sign_payloads(&constructed.payloads)
            .map_err(fail(stage))?;
        stage = Stage::Signed;

        let signed_transaction = self
            .api
            .combine(&constructed.unsigned_transaction, &signatures)
            .await
            .map_err(fail(stage))?;
        stage = Stage::Combined;

        let submitted = self.api.submit(&signed_transaction).await.map_err(fail(stage))?;
        let verified = self
            .api
            .get_transaction_hash(&signed_transaction)
            .await
            .map_err(fail(stage))?;
        if verified.hash != submitted.hash {
            return Err(fail(stage)(Error::validation(format!(
                "transaction hash mismatch: submit returned {}, hash endpoint returned {}",
                submitted.hash, verified.hash
            ))));
        }
        stage = Stage::Submitted;
        info!(
            "transaction {} submitted ({} in, {} out)",
            submitted.hash,
            total_input(inputs),
            total_output(&outputs)
        );

        let (block, onchain) =
            await_confirmation(self.api, &self.clock, &self.policy, &submitted.hash)
                .await
                .map_err(fail(stage))?;
        validate_onchain(&operations, &onchain).map_err(fail(stage))?;
        stage = Stage::Confirmed;

        let fee = self.paid_fee(&operations, stake_ops).map_err(fail(stage))?;
        info!(
            "transaction {} confirmed in block {} (fee {} lovelace)",
            submitted.hash, block.index, fee
        );

        Ok(Confirmation {
            hash: submitted.hash,
            fee,
            block,
            operations: onchain.operations,
        })
    }

    /// Parses a constructed transaction back and checks its operations
    /// against the list that produced it.
    pub async fn verify_unsigned(
        &self,
        unsigned_transaction: &str,
        expected: &[Operation],
    ) -> rosetta_core::Result<()> {
        let parsed = self.api.parse(unsigned_transaction, false).await?;
        let as_transaction = BlockTransaction {
            transaction_identifier: rosetta_core::TransactionIdentifier {
                hash: String::new(),
            },
            operations: parsed.operations,
        };
        validate_onchain(expected, &as_transaction)
    }

    fn stake_identity(
        &self,
        stake_ops: &[StakeOperationKind],
    ) -> rosetta_core::Result<Option<(String, rosetta_core::PublicKey)>> {
        if stake_ops.is_empty() {
            return Ok(None);
        }
        let address = self.signer.stake_address().ok_or_else(|| {
            Error::validation("stake operations requested but the signer holds no stake key")
        })?;
        let credential = self.signer.staking_credential().ok_or_else(|| {
            Error::validation("stake operations requested but the signer holds no stake key")
        })?;
        Ok(Some((address.to_string(), credential)))
    }

    /// Signs every payload, keeping one signature per distinct
    /// (payload, key) pair.
    fn sign_payloads(
        &self,
        payloads: &[rosetta_core::SigningPayload],
    ) -> rosetta_core::Result<Vec<Signature>> {
        if payloads.is_empty() {
            return Err(Error::validation(
                "construction returned no signing payloads",
            ));
        }

        let mut signatures: Vec<Signature> = Vec::new();
        for payload in payloads {
            let signature = self.signer.sign(payload)?;
            let duplicate = signatures.iter().any(|s| {
                s.public_key == signature.public_key
                    && s.signing_payload.hex_bytes == signature.signing_payload.hex_bytes
            });
            if !duplicate {
                signatures.push(signature);
            }
        }
        Ok(signatures)
    }

    /// Fee actually paid: the input/output balance, net of certificate
    /// deposits locked and refunded.
    fn paid_fee(
        &self,
        operations: &[Operation],
        stake_ops: &[StakeOperationKind],
    ) -> rosetta_core::Result<u64> {
        let balance = balance_of(operations)?;
        let net_deposit: i64 = stake_ops
            .iter()
            .map(|op| match op {
                StakeOperationKind::Registration => STAKE_KEY_DEPOSIT as i64,
                StakeOperationKind::Deregistration => -(STAKE_KEY_DEPOSIT as i64),
                StakeOperationKind::Delegation { .. } => 0,
            })
            .sum();

        let fee = balance - net_deposit;
        u64::try_from(fee).map_err(|_| {
            Error::validation(format!(
                "negative fee computed: balance={balance}, net deposit={net_deposit}"
            ))
        })
    }
}
