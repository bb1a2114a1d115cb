//! Pluggable trade/no-trade decision.
//!
//! A policy sees only the cycle's [`Quote`] and answers whether to trade.
//! The shipped policies are placeholders; a real strategy implements
//! [`DecisionPolicy`] and is swapped in without touching quoting or
//! execution.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::domain::Quote;

/// A trade/no-trade predicate over a quote.
pub trait DecisionPolicy: Send + Sync {
    /// Unique identifier used in configuration and logging.
    fn name(&self) -> &'static str;

    /// Whether to execute the trade described by `quote`.
    fn decide(&self, quote: &Quote) -> bool;
}

/// Trades every cycle.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysTrade;

impl DecisionPolicy for AlwaysTrade {
    fn name(&self) -> &'static str {
        "always"
    }

    fn decide(&self, _quote: &Quote) -> bool {
        true
    }
}

/// Trades on a fair coin flip. Seeded instances are reproducible.
pub struct CoinFlip {
    rng: Mutex<StdRng>,
}

impl CoinFlip {
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl DecisionPolicy for CoinFlip {
    fn name(&self) -> &'static str {
        "coin_flip"
    }

    fn decide(&self, _quote: &Quote) -> bool {
        self.rng.lock().gen_bool(0.5)
    }
}

/// Policy selector as written in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    Always,
    CoinFlip,
}

impl PolicyKind {
    #[must_use]
    pub fn build(self, seed: Option<u64>) -> Box<dyn DecisionPolicy> {
        match self {
            Self::Always => Box::new(AlwaysTrade),
            Self::CoinFlip => Box::new(CoinFlip::new(seed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::quote;
    use rust_decimal_macros::dec;

    #[test]
    fn always_trades() {
        let q = quote(dec!(1), dec!(25));
        assert!(AlwaysTrade.decide(&q));
        assert_eq!(AlwaysTrade.name(), "always");
    }

    #[test]
    fn seeded_coin_flip_is_reproducible() {
        let q = quote(dec!(1), dec!(25));
        let a = CoinFlip::new(Some(7));
        let b = CoinFlip::new(Some(7));
        let first: Vec<bool> = (0..32).map(|_| a.decide(&q)).collect();
        let second: Vec<bool> = (0..32).map(|_| b.decide(&q)).collect();
        assert_eq!(first, second);
        // 32 fair flips landing all one way would mean the coin is stuck
        assert!(first.iter().any(|d| *d));
        assert!(first.iter().any(|d| !*d));
    }

    #[test]
    fn kind_builds_named_policy() {
        assert_eq!(PolicyKind::Always.build(None).name(), "always");
        assert_eq!(PolicyKind::CoinFlip.build(Some(1)).name(), "coin_flip");
        assert_eq!(PolicyKind::default(), PolicyKind::Always);
    }
}
