//! Exchange-agnostic domain types.
//!
//! Everything in here is created fresh for each cycle and discarded when the
//! cycle settles, except the [`TokenDefinition`]s and [`TradingPair`], which
//! are built once from configuration.

mod gas;
mod holding;
mod order;
mod pair;
mod quote;
mod token;
mod transaction;

pub mod units;

pub use gas::{GasPriceQuote, GasTier};
pub use holding::Holding;
pub use order::OrderDescriptor;
pub use pair::TradingPair;
pub use quote::Quote;
pub use token::{TokenAmount, TokenDefinition};
pub use transaction::{
    SendParams, TransactionEvent, TransactionReceipt, TransactionState,
};
