//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Every network-bound collaborator of the rebalancing pipeline sits behind
//! one of these traits so the pipeline can be driven by the on-chain
//! adapters in production and by scripted fakes in tests.
//!
//! # Available Ports
//!
//! - [`FundAccounting`] - Balance snapshot of the fund
//! - [`ExchangeRegistry`], [`ExchangePricer`] - AMM exchange lookup and quoting
//! - [`GasPriceOracle`] - Gas price resolution
//! - [`TradeVenue`], [`OrderTransaction`] - Order submission lifecycle

mod accounting;
mod exchange;
mod gas;
mod trading;

pub use accounting::FundAccounting;
pub use exchange::{ExchangePricer, ExchangeRegistry};
pub use gas::GasPriceOracle;
pub use trading::{OrderTransaction, TradeVenue};
