use alloy_primitives::Address;
use alloy_provider::DynProvider;
use async_trait::async_trait;
use tracing::debug;

use super::contracts::IAccounting;
use crate::domain::Holding;
use crate::error::{Error, Result};
use crate::port::FundAccounting;

/// Holdings read from the fund's accounting contract.
pub struct MelonAccounting {
    accounting: Address,
    provider: DynProvider,
}

impl MelonAccounting {
    #[must_use]
    pub fn new(accounting: Address, provider: DynProvider) -> Self {
        Self {
            accounting,
            provider,
        }
    }
}

#[async_trait]
impl FundAccounting for MelonAccounting {
    async fn holdings(&self) -> Result<Vec<Holding>> {
        let contract = IAccounting::new(self.accounting, &self.provider);
        let result = contract
            .getFundHoldings()
            .call()
            .await
            .map_err(|e| Error::Rpc(format!("getFundHoldings: {e}")))?;

        if result.amounts.len() != result.assets.len() {
            return Err(Error::Rpc(format!(
                "getFundHoldings returned {} amounts for {} assets",
                result.amounts.len(),
                result.assets.len()
            )));
        }

        let holdings: Vec<Holding> = result
            .assets
            .into_iter()
            .zip(result.amounts)
            .map(|(asset, amount)| Holding::new(asset, amount))
            .collect();

        debug!(accounting = %self.accounting, assets = holdings.len(), "Fund holdings read");
        Ok(holdings)
    }
}
