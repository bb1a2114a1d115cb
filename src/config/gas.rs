use rust_decimal::Decimal;
use serde::Deserialize;

/// Gas fee feed settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GasConfig {
    pub feed_url: String,
    /// Confirmation-time ceiling used to pick a fee tier.
    #[serde(default = "default_max_wait_minutes")]
    pub max_wait_minutes: Decimal,
    /// Feed prices are divided by this to get gwei (10 for ethgasstation).
    #[serde(default = "default_price_divisor")]
    pub price_divisor: Decimal,
    /// Gwei price used when the feed cannot be read. Without it a feed
    /// outage skips the cycle's trade.
    #[serde(default)]
    pub fallback_gwei: Option<Decimal>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_max_wait_minutes() -> Decimal {
    Decimal::TWO
}

fn default_price_divisor() -> Decimal {
    Decimal::ONE
}

const fn default_timeout_secs() -> u64 {
    10
}
