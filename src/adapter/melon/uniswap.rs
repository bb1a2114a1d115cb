//! Uniswap v1 factory and exchange queries.

use alloy_primitives::{Address, U256};
use alloy_provider::DynProvider;
use async_trait::async_trait;

use super::contracts::{IUniswapExchange, IUniswapFactory};
use crate::error::{Error, Result};
use crate::port::{ExchangePricer, ExchangeRegistry};

/// Every v1 exchange pairs ETH (held by the fund as WETH) with one token.
pub struct UniswapExchanges {
    factory: Address,
    provider: DynProvider,
}

impl UniswapExchanges {
    #[must_use]
    pub fn new(factory: Address, provider: DynProvider) -> Self {
        Self { factory, provider }
    }
}

#[async_trait]
impl ExchangeRegistry for UniswapExchanges {
    async fn exchange_for(&self, token: Address) -> Result<Option<Address>> {
        let exchange = IUniswapFactory::new(self.factory, &self.provider)
            .getExchange(token)
            .call()
            .await
            .map_err(|e| Error::Rpc(format!("getExchange({token}): {e}")))?;

        // The factory answers the zero address for unknown tokens.
        Ok((exchange != Address::ZERO).then_some(exchange))
    }
}

#[async_trait]
impl ExchangePricer for UniswapExchanges {
    async fn anchor_to_token(&self, exchange: Address, anchor_in: U256) -> Result<U256> {
        IUniswapExchange::new(exchange, &self.provider)
            .getEthToTokenInputPrice(anchor_in)
            .call()
            .await
            .map_err(|e| Error::Rpc(format!("getEthToTokenInputPrice: {e}")))
    }

    async fn token_to_anchor(&self, exchange: Address, token_in: U256) -> Result<U256> {
        IUniswapExchange::new(exchange, &self.provider)
            .getTokenToEthInputPrice(token_in)
            .call()
            .await
            .map_err(|e| Error::Rpc(format!("getTokenToEthInputPrice: {e}")))
    }
}
