//! Directional quoting against the anchor-paired AMM exchanges.
//!
//! Selling the anchor asset asks the exchange for an anchor-in/token-out
//! price; selling the other token asks for token-in/anchor-out. Getting this
//! branch backwards silently inverts the trade, so it lives in exactly one
//! place ([`QuoteEngine::direction`]).

use std::fmt;
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::domain::{units, Quote, TokenDefinition};
use crate::error::{NumericError, QuoteError, Result};
use crate::port::{ExchangePricer, ExchangeRegistry};

/// Which input-price query an exchange is asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
    /// Base is the anchor: sell anchor, receive token.
    AnchorToToken,
    /// Base is the token: sell token, receive anchor.
    TokenToAnchor,
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnchorToToken => f.write_str("anchor->token"),
            Self::TokenToAnchor => f.write_str("token->anchor"),
        }
    }
}

pub struct QuoteEngine {
    anchor: TokenDefinition,
    registry: Arc<dyn ExchangeRegistry>,
    pricer: Arc<dyn ExchangePricer>,
}

impl QuoteEngine {
    pub fn new(
        anchor: TokenDefinition,
        registry: Arc<dyn ExchangeRegistry>,
        pricer: Arc<dyn ExchangePricer>,
    ) -> Self {
        Self {
            anchor,
            registry,
            pricer,
        }
    }

    /// Query direction for selling `base` into `quote`, plus the token that
    /// identifies the exchange.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::UnsupportedPair`] unless exactly one side is the
    /// anchor.
    pub fn direction<'a>(
        &self,
        base: &'a TokenDefinition,
        quote: &'a TokenDefinition,
    ) -> std::result::Result<(SwapDirection, &'a TokenDefinition), QuoteError> {
        let base_is_anchor = base.is(self.anchor.address);
        let quote_is_anchor = quote.is(self.anchor.address);

        match (base_is_anchor, quote_is_anchor) {
            (true, false) => Ok((SwapDirection::AnchorToToken, quote)),
            (false, true) => Ok((SwapDirection::TokenToAnchor, base)),
            _ => Err(QuoteError::UnsupportedPair {
                base: base.symbol.clone(),
                quote: quote.symbol.clone(),
                anchor: self.anchor.symbol.clone(),
            }),
        }
    }

    /// Quote selling `base_quantity` of `base` for `quote`.
    ///
    /// # Errors
    ///
    /// Surfaces [`QuoteError::ExchangeNotFound`] when the factory has no
    /// exchange for the pair's token, numeric errors for unusable quantities,
    /// and any RPC failure from the underlying queries.
    pub async fn get_quote(
        &self,
        base: &TokenDefinition,
        quote: &TokenDefinition,
        base_quantity: Decimal,
    ) -> Result<Quote> {
        let (direction, exchange_token) = self.direction(base, quote)?;

        let exchange = self
            .registry
            .exchange_for(exchange_token.address)
            .await?
            .filter(|address| *address != Address::ZERO)
            .ok_or_else(|| QuoteError::ExchangeNotFound {
                token: exchange_token.address,
                symbol: exchange_token.symbol.clone(),
            })?;

        let raw_in = units::to_base_units(base_quantity, base.decimals)?;
        if raw_in == U256::ZERO {
            return Err(NumericError::InvalidInput {
                input: base_quantity.to_string(),
                reason: format!("rounds to zero {} base units", base.symbol),
            }
            .into());
        }

        debug!(
            exchange = %exchange,
            direction = %direction,
            raw_in = %raw_in,
            "Querying exchange"
        );

        let raw_out = match direction {
            SwapDirection::AnchorToToken => self.pricer.anchor_to_token(exchange, raw_in).await?,
            SwapDirection::TokenToAnchor => self.pricer.token_to_anchor(exchange, raw_in).await?,
        };

        let size_in_base = units::from_base_units(raw_in, base.decimals)?;
        let size_in_quote = units::from_base_units(raw_out, quote.decimals)?;
        let quote = Quote::from_sizes(base.clone(), quote.clone(), size_in_base, size_in_quote, exchange)?;

        info!(
            base = %quote.base,
            quote = %quote.quote,
            size_in_base = %quote.size_in_base,
            size_in_quote = %quote.size_in_quote,
            price_in_base = %quote.price_in_base,
            price_in_quote = %quote.price_in_quote,
            exchange = %exchange,
            "Quote computed"
        );

        Ok(quote)
    }
}
