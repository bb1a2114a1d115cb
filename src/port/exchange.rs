//! AMM exchange ports.
//!
//! Every exchange in the family pairs the anchor asset against exactly one
//! other token, so an exchange is identified by its non-anchor token.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;

use crate::error::Result;

/// Factory lookup from token to exchange.
#[async_trait]
pub trait ExchangeRegistry: Send + Sync {
    /// The exchange trading `token` against the anchor, or `None` if no
    /// exchange has been created for it.
    async fn exchange_for(&self, token: Address) -> Result<Option<Address>>;
}

/// Read-only price queries against an exchange's current reserves.
///
/// Both methods are "input price" queries: given an exact amount sold, how
/// much of the other side would be received.
#[async_trait]
pub trait ExchangePricer: Send + Sync {
    /// Token received for selling `anchor_in` of the anchor asset.
    async fn anchor_to_token(&self, exchange: Address, anchor_in: U256) -> Result<U256>;

    /// Anchor asset received for selling `token_in` of the exchange's token.
    async fn token_to_anchor(&self, exchange: Address, token_in: U256) -> Result<U256>;
}
