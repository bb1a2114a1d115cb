//! Token metadata and typed quantities.

use std::fmt;

use alloy_primitives::{Address, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::units;
use crate::error::NumericError;

/// Static description of an ERC-20 token the fund can hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenDefinition {
    pub symbol: String,
    pub address: Address,
    pub decimals: u8,
}

impl TokenDefinition {
    pub fn new(symbol: impl Into<String>, address: Address, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            address,
            decimals,
        }
    }

    /// Whether `address` refers to this token.
    #[must_use]
    pub fn is(&self, address: Address) -> bool {
        self.address == address
    }
}

impl fmt::Display for TokenDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// A quantity of a specific token, stored in integer base units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAmount {
    raw: U256,
    decimals: u8,
    symbol: String,
}

impl TokenAmount {
    /// Wrap a raw base-unit quantity of `token`.
    #[must_use]
    pub fn from_raw(token: &TokenDefinition, raw: U256) -> Self {
        Self {
            raw,
            decimals: token.decimals,
            symbol: token.symbol.clone(),
        }
    }

    /// Build an amount from a decimal quantity of `token`.
    ///
    /// Digits beyond the token's precision are truncated.
    ///
    /// # Errors
    ///
    /// Returns a [`NumericError`] if the value is negative or out of range.
    pub fn from_decimal(token: &TokenDefinition, value: Decimal) -> Result<Self, NumericError> {
        Ok(Self::from_raw(token, units::to_base_units(value, token.decimals)?))
    }

    #[must_use]
    pub const fn raw(&self) -> U256 {
        self.raw
    }

    #[must_use]
    pub const fn decimals(&self) -> u8 {
        self.decimals
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The human-readable decimal value.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::Overflow`] if the raw value is too large for a
    /// `Decimal` at this precision.
    pub fn to_decimal(&self) -> Result<Decimal, NumericError> {
        units::from_base_units(self.raw, self.decimals)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_decimal() {
            Ok(value) => write!(f, "{value} {}", self.symbol),
            Err(_) => write!(f, "{} raw {}", self.raw, self.symbol),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn mln() -> TokenDefinition {
        TokenDefinition::new("MLN", Address::repeat_byte(0x11), 18)
    }

    #[test]
    fn amount_keeps_token_precision() {
        let amount = TokenAmount::from_decimal(&mln(), dec!(2.5)).unwrap();
        assert_eq!(amount.raw(), U256::from(2_500_000_000_000_000_000u128));
        assert_eq!(amount.decimals(), 18);
        assert_eq!(amount.symbol(), "MLN");
        assert_eq!(amount.to_decimal().unwrap(), dec!(2.5));
    }

    #[test]
    fn amount_displays_with_symbol() {
        let amount = TokenAmount::from_raw(&mln(), U256::from(1_000_000_000_000_000_000u128));
        assert_eq!(amount.to_string(), "1 MLN");
    }

    #[test]
    fn definition_matches_its_address() {
        let token = mln();
        assert!(token.is(Address::repeat_byte(0x11)));
        assert!(!token.is(Address::ZERO));
    }
}
