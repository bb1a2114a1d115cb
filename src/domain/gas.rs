use std::fmt;

use rust_decimal::Decimal;

/// Which part of the fee feed a gas price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasTier {
    /// Cheapest tier whose estimated wait fits the ceiling.
    Qualifying { estimated_minutes: Decimal },
    /// No tier qualified; the feed's "fast" price was used.
    Fast,
    /// The feed could not be read; the configured fallback was used.
    Fallback,
}

impl fmt::Display for GasTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Qualifying { estimated_minutes } => write!(f, "~{estimated_minutes}min"),
            Self::Fast => write!(f, "fast"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// A resolved gas price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasPriceQuote {
    pub wei_per_gas: u128,
    pub max_wait_minutes: Decimal,
    pub tier: GasTier,
}
