//! Pair selection and trading parameters.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::application::PolicyKind;

/// Which two `[[tokens]]` the fund rotates between, by symbol.
#[derive(Debug, Clone, Deserialize)]
pub struct PairConfig {
    pub one: String,
    pub two: String,
    /// The exchange family's common asset; must be `one` or `two`.
    pub anchor: String,
    /// Token kept when both balances are equal; defaults to `one`.
    #[serde(default)]
    pub tie_break: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StrategyConfig {
    /// Balances at or below this many whole tokens count as empty.
    #[serde(default = "default_dust_threshold")]
    pub dust_threshold: Decimal,
    /// Fraction of the quoted output demanded from the exchange.
    #[serde(default = "default_slippage")]
    pub slippage: Decimal,
    #[serde(default)]
    pub policy: PolicyKind,
    /// Seed for randomized policies; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_dust_threshold() -> Decimal {
    dec!(0.1)
}

fn default_slippage() -> Decimal {
    dec!(0.97)
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            dust_threshold: default_dust_threshold(),
            slippage: default_slippage(),
            policy: PolicyKind::default(),
            seed: None,
        }
    }
}
