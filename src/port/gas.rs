use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::GasPriceQuote;
use crate::error::Result;

/// Source of gas prices keyed by a confirmation-time ceiling.
#[async_trait]
pub trait GasPriceOracle: Send + Sync {
    /// Cheapest price expected to confirm within `max_wait_minutes`.
    async fn resolve(&self, max_wait_minutes: Decimal) -> Result<GasPriceQuote>;
}
