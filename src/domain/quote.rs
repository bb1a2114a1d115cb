//! Directional exchange quotes.

use alloy_primitives::Address;
use rust_decimal::Decimal;

use super::TokenDefinition;
use crate::error::{NumericError, QuoteError};

/// Tolerance for the reciprocity check between the two price fields.
const RECIPROCAL_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 18);

/// What the exchange would pay, in `quote`, for selling `size_in_base` of
/// `base`.
///
/// `price_in_quote` is always derived as the reciprocal of `price_in_base`;
/// it is never an independent market observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub base: TokenDefinition,
    pub quote: TokenDefinition,
    pub price_in_base: Decimal,
    pub price_in_quote: Decimal,
    pub size_in_base: Decimal,
    pub size_in_quote: Decimal,
    pub exchange: Address,
}

impl Quote {
    /// Build a quote from the two observed sizes.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::InvalidInput`] for a zero base size and
    /// [`QuoteError::EmptyQuote`] when the exchange offers nothing in return.
    pub fn from_sizes(
        base: TokenDefinition,
        quote: TokenDefinition,
        size_in_base: Decimal,
        size_in_quote: Decimal,
        exchange: Address,
    ) -> crate::error::Result<Self> {
        if size_in_base <= Decimal::ZERO {
            return Err(NumericError::InvalidInput {
                input: size_in_base.to_string(),
                reason: "quote size must be positive".into(),
            }
            .into());
        }

        let empty = || QuoteError::EmptyQuote {
            exchange,
            base: base.symbol.clone(),
            quote: quote.symbol.clone(),
            size: size_in_base,
        };

        if size_in_quote <= Decimal::ZERO {
            return Err(empty().into());
        }

        let price_in_base = size_in_quote.checked_div(size_in_base).ok_or_else(empty)?;
        let price_in_quote = Decimal::ONE.checked_div(price_in_base).ok_or_else(empty)?;

        Ok(Self {
            base,
            quote,
            price_in_base,
            price_in_quote,
            size_in_base,
            size_in_quote,
            exchange,
        })
    }

    /// Whether the two price fields multiply back to one within rounding.
    #[must_use]
    pub fn is_reciprocal(&self) -> bool {
        self.price_in_base
            .checked_mul(self.price_in_quote)
            .is_some_and(|product| (product - Decimal::ONE).abs() <= RECIPROCAL_TOLERANCE)
    }
}
