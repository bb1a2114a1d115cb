//! Slippage-adjusted order construction.

use rust_decimal::Decimal;
use tracing::info;

use crate::domain::{units, OrderDescriptor, Quote};
use crate::error::{ConfigError, NumericError};

/// Builds "sell base, buy quote" orders from quotes.
///
/// Slippage is applied once, to the maker (bought) side only: the fund
/// offers its whole base position and accepts up to `1 - slippage` less of
/// the quote token than quoted.
#[derive(Debug, Clone, Copy)]
pub struct OrderBuilder {
    slippage: Decimal,
}

impl OrderBuilder {
    /// `slippage` is the fraction of the quoted output to demand, e.g.
    /// `0.97` to accept a 3% worse fill.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] unless `0 < slippage <= 1`.
    pub fn new(slippage: Decimal) -> Result<Self, ConfigError> {
        if slippage <= Decimal::ZERO || slippage > Decimal::ONE {
            return Err(ConfigError::InvalidValue {
                field: "strategy.slippage",
                reason: format!("must be in (0, 1], got {slippage}"),
            });
        }
        Ok(Self { slippage })
    }

    #[must_use]
    pub const fn slippage(&self) -> Decimal {
        self.slippage
    }

    /// # Errors
    ///
    /// Returns a [`NumericError`] if a quantity cannot be expressed in base
    /// units.
    pub fn build(&self, quote: &Quote) -> Result<OrderDescriptor, NumericError> {
        let discounted = quote
            .size_in_quote
            .checked_mul(self.slippage)
            .ok_or_else(|| NumericError::Overflow {
                value: quote.size_in_quote.to_string(),
                decimals: quote.quote.decimals,
            })?;

        let order = OrderDescriptor {
            maker_asset: quote.quote.address,
            taker_asset: quote.base.address,
            maker_quantity: units::to_base_units(discounted, quote.quote.decimals)?,
            taker_quantity: units::to_base_units(quote.size_in_base, quote.base.decimals)?,
        };

        info!(
            buy = %format!("{discounted} {}", quote.quote),
            sell = %format!("{} {}", quote.size_in_base, quote.base),
            maker_quantity = %order.maker_quantity,
            taker_quantity = %order.taker_quantity,
            slippage = %self.slippage,
            "Order built"
        );

        Ok(order)
    }
}
