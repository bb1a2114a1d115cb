//! Turning a holdings snapshot into the position to trade.
//!
//! The fund is expected to hold exactly one of the two tracked tokens at a
//! time. Balances at or below the dust threshold count as empty. If both
//! tokens are above dust (possible after a partial failure), the larger
//! balance wins and exact ties go to the pair's configured tie-break token.

use alloy_primitives::U256;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::domain::{units, Holding, TokenAmount, TokenDefinition, TradingPair};
use crate::error::{ConfigError, Result};

/// The held (base) and empty (quote) tokens for this cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub base: TokenDefinition,
    pub quote: TokenDefinition,
    pub amount: TokenAmount,
    /// Decimal value of `amount`.
    pub quantity: Decimal,
    /// Both tokens were above the dust threshold.
    pub inconsistent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionAssessment {
    Held(Position),
    /// Both balances are dust; nothing to trade this cycle.
    NoPosition,
}

pub struct BalanceEvaluator {
    pair: TradingPair,
    dust_threshold: Decimal,
}

impl BalanceEvaluator {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the threshold is not positive.
    pub fn new(pair: TradingPair, dust_threshold: Decimal) -> std::result::Result<Self, ConfigError> {
        if dust_threshold <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "strategy.dust_threshold",
                reason: format!("must be positive, got {dust_threshold}"),
            });
        }
        Ok(Self {
            pair,
            dust_threshold,
        })
    }

    #[must_use]
    pub const fn pair(&self) -> &TradingPair {
        &self.pair
    }

    /// Decide which token is held.
    ///
    /// Tokens missing from the snapshot count as zero; untracked tokens are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns a numeric error if a raw balance cannot be represented as a
    /// decimal at the token's precision.
    pub fn evaluate(&self, holdings: &[Holding]) -> Result<PositionAssessment> {
        let one = self.pair.one();
        let two = self.pair.two();

        let raw_one = raw_balance(holdings, one);
        let raw_two = raw_balance(holdings, two);
        let value_one = units::from_base_units(raw_one, one.decimals)?;
        let value_two = units::from_base_units(raw_two, two.decimals)?;

        debug!(
            token_one = %one,
            balance_one = %value_one,
            token_two = %two,
            balance_two = %value_two,
            dust_threshold = %self.dust_threshold,
            "Evaluating balances"
        );

        let one_held = value_one > self.dust_threshold;
        let two_held = value_two > self.dust_threshold;

        let (base_is_one, inconsistent) = match (one_held, two_held) {
            (false, false) => return Ok(PositionAssessment::NoPosition),
            (true, false) => (true, false),
            (false, true) => (false, false),
            (true, true) => {
                let base_is_one = if value_one == value_two {
                    self.pair.tie_break().address == one.address
                } else {
                    value_one > value_two
                };
                let held = if base_is_one { one } else { two };
                warn!(
                    anomaly = "inconsistent_balance_state",
                    token_one = %one,
                    balance_one = %value_one,
                    token_two = %two,
                    balance_two = %value_two,
                    held = %held,
                    "Both tokens held above dust threshold"
                );
                (base_is_one, true)
            }
        };

        let (base, quote, raw, quantity) = if base_is_one {
            (one, two, raw_one, value_one)
        } else {
            (two, one, raw_two, value_two)
        };

        Ok(PositionAssessment::Held(Position {
            base: base.clone(),
            quote: quote.clone(),
            amount: TokenAmount::from_raw(base, raw),
            quantity,
            inconsistent,
        }))
    }
}

/// First snapshot entry for `token`, or zero.
fn raw_balance(holdings: &[Holding], token: &TokenDefinition) -> U256 {
    holdings
        .iter()
        .find(|h| token.is(h.token))
        .map_or(U256::ZERO, |h| h.raw_amount)
}
