//! Application services (use cases).
//!
//! One service per stage of the rebalancing pipeline. Services hold no
//! mutable state across cycles; network-bound collaborators are reached
//! through [`crate::port`] traits.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

pub mod balance;
pub mod executor;
pub mod order;
pub mod policy;
pub mod quote;

pub use balance::{BalanceEvaluator, Position, PositionAssessment};
pub use executor::{TransactionExecutor, TransactionHandle};
pub use order::OrderBuilder;
pub use policy::{AlwaysTrade, CoinFlip, DecisionPolicy, PolicyKind};
pub use quote::{QuoteEngine, SwapDirection};

/// Await `fut` unless `cancel` fires first.
///
/// Only for work that is safe to abandon: nothing has been broadcast yet.
pub(crate) async fn until_cancelled<T, F>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(Error::Cancelled),
        result = fut => result,
    }
}
