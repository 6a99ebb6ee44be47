//! UTXO selection over the account's spendable set.
//!
//! Selection pulls the full coin set (mempool included) through the
//! gateway, filters it against the caller's requirements and applies a
//! deterministic choice policy. Concurrent builds must pass each other's
//! selections through `exclude` to keep their inputs disjoint; nothing
//! here serializes concurrent callers.

use log::debug;

use rosetta_core::{Error, Result, SpendableInput};
use rosetta_gateway::RosettaApi;

/// A native asset the selected UTXO(s) must carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequirement {
    pub policy_id: String,
    pub asset_name: String,
    /// Minimum amount of the asset
    pub amount: u64,
}

/// Chooses spendable inputs for an address through a [`RosettaApi`]
pub struct UtxoSelector<'a, A: RosettaApi> {
    api: &'a A,
}

impl<'a, A: RosettaApi> UtxoSelector<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Fetches the spendable set for `address`, minus excluded coins.
    /// Fails when the address holds nothing at all.
    async fn spendable_set(
        &self,
        address: &str,
        exclude: &[String],
    ) -> Result<Vec<SpendableInput>> {
        let coins = self.api.get_utxos(address).await?;
        if coins.is_empty() {
            return Err(Error::validation(format!(
                "no UTXOs found for address {address}"
            )));
        }

        let inputs = coins
            .iter()
            .filter(|c| !exclude.contains(&c.coin_identifier.identifier))
            .map(|c| c.to_spendable_input(address))
            .collect::<Result<Vec<_>>>()?;
        debug!(
            "{} spendable UTXOs for {address} after excluding {}",
            inputs.len(),
            exclude.len()
        );
        Ok(inputs)
    }

    /// Returns every UTXO satisfying the given requirements.
    ///
    /// `min_amount` filters on per-entry value; `required_assets` keeps only
    /// entries covering every `(policy_id, asset_name)` pair with at least
    /// the requested amount. Fails with a validation error naming the unmet
    /// requirements when no candidate remains.
    pub async fn select(
        &self,
        address: &str,
        min_amount: Option<u64>,
        required_assets: &[AssetRequirement],
        exclude: &[String],
    ) -> Result<Vec<SpendableInput>> {
        let candidates = self.spendable_set(address, exclude).await?;

        let suitable: Vec<SpendableInput> = candidates
            .into_iter()
            .filter(|utxo| min_amount.map_or(true, |min| utxo.value >= min))
            .filter(|utxo| {
                required_assets.iter().all(|req| {
                    utxo.assets.iter().any(|asset| {
                        asset.policy_id == req.policy_id
                            && asset.asset_name == req.asset_name
                            && asset.amount >= req.amount
                    })
                })
            })
            .collect();

        if suitable.is_empty() {
            let mut requirements = Vec::new();
            if let Some(min) = min_amount {
                requirements.push(format!("min {min} lovelace"));
            }
            if !required_assets.is_empty() {
                requirements.push(format!("assets: {required_assets:?}"));
            }
            return Err(Error::validation(format!(
                "no suitable UTXOs found matching requirements: {}",
                requirements.join(", ")
            )));
        }

        Ok(suitable)
    }

    /// Selects the single smallest ADA-only UTXO worth at least `min_amount`.
    ///
    /// Preferring the tightest fit over the threshold keeps large UTXOs
    /// intact and limits fragmentation. Ties on value break on the coin
    /// identifier so repeated runs pick the same entry.
    pub async fn select_ada_only(
        &self,
        address: &str,
        min_amount: u64,
        exclude: &[String],
    ) -> Result<SpendableInput> {
        let suitable = self
            .select(address, Some(min_amount), &[], exclude)
            .await?;

        suitable
            .into_iter()
            .filter(|utxo| utxo.is_ada_only())
            .min_by(|a, b| {
                a.value
                    .cmp(&b.value)
                    .then_with(|| a.coin_identifier.cmp(&b.coin_identifier))
            })
            .ok_or_else(|| {
                Error::validation(format!(
                    "no UTXOs found with only ADA and minimum {min_amount} lovelace"
                ))
            })
    }

    /// Selects exactly `count` UTXOs whose combined value covers `min_total`.
    ///
    /// Policy: largest-first. Candidates are sorted by descending value
    /// (coin identifier as tie-break) and the first `count` taken, which
    /// maximizes the chance that a fixed input count covers the target.
    /// Deterministic, since downstream fee estimation depends on the exact
    /// input count chosen.
    pub async fn select_multiple(
        &self,
        address: &str,
        count: usize,
        min_total: u64,
        exclude: &[String],
    ) -> Result<Vec<SpendableInput>> {
        let mut candidates = self.spendable_set(address, exclude).await?;
        candidates.retain(|utxo| utxo.is_ada_only());

        if candidates.len() < count {
            return Err(Error::validation(format!(
                "requested {count} UTXOs but only {} are available for {address}",
                candidates.len()
            )));
        }

        candidates.sort_by(|a, b| {
            b.value
                .cmp(&a.value)
                .then_with(|| a.coin_identifier.cmp(&b.coin_identifier))
        });
        candidates.truncate(count);

        let total: u64 = candidates.iter().map(|u| u.value).sum();
        if total < min_total {
            return Err(Error::validation(format!(
                "{count} largest UTXOs total {total} lovelace, below the required {min_total}"
            )));
        }

        debug!("selected {count} UTXOs totalling {total} lovelace");
        Ok(candidates)
    }
}
