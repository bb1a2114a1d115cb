//! The two tracked tokens and their roles.

use super::TokenDefinition;
use crate::error::ConfigError;

/// The pair of tokens the fund rotates between.
///
/// Exactly one of the two is the exchange family's anchor asset (for
/// Uniswap v1, WETH); the other identifies which exchange to trade on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradingPair {
    one: TokenDefinition,
    two: TokenDefinition,
    anchor_is_one: bool,
    tie_break_is_one: bool,
}

impl TradingPair {
    /// Build a pair, checking that the tokens are distinct and that `anchor`
    /// and `tie_break` each name one of them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the pair is malformed.
    pub fn try_new(
        one: TokenDefinition,
        two: TokenDefinition,
        anchor: &str,
        tie_break: &str,
    ) -> Result<Self, ConfigError> {
        if one.address == two.address {
            return Err(ConfigError::InvalidValue {
                field: "pair",
                reason: format!("{} and {} share address {}", one, two, one.address),
            });
        }

        let role = |field: &'static str, symbol: &str| -> Result<bool, ConfigError> {
            if symbol == one.symbol {
                Ok(true)
            } else if symbol == two.symbol {
                Ok(false)
            } else {
                Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("{symbol} is neither {} nor {}", one.symbol, two.symbol),
                })
            }
        };

        let anchor_is_one = role("pair.anchor", anchor)?;
        let tie_break_is_one = role("pair.tie_break", tie_break)?;

        Ok(Self {
            one,
            two,
            anchor_is_one,
            tie_break_is_one,
        })
    }

    #[must_use]
    pub const fn one(&self) -> &TokenDefinition {
        &self.one
    }

    #[must_use]
    pub const fn two(&self) -> &TokenDefinition {
        &self.two
    }

    #[must_use]
    pub const fn anchor(&self) -> &TokenDefinition {
        if self.anchor_is_one {
            &self.one
        } else {
            &self.two
        }
    }

    /// Token treated as held when both balances are equal and above dust.
    #[must_use]
    pub const fn tie_break(&self) -> &TokenDefinition {
        if self.tie_break_is_one {
            &self.one
        } else {
            &self.two
        }
    }

    /// Look a token up by symbol.
    #[must_use]
    pub fn by_symbol(&self, symbol: &str) -> Option<&TokenDefinition> {
        [&self.one, &self.two]
            .into_iter()
            .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
    }

    /// The counterpart of `token` within the pair, or `None` if `token` is
    /// not a member.
    #[must_use]
    pub fn other(&self, token: &TokenDefinition) -> Option<&TokenDefinition> {
        if token.address == self.one.address {
            Some(&self.two)
        } else if token.address == self.two.address {
            Some(&self.one)
        } else {
            None
        }
    }
}
