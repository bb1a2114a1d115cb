//! Order submission ports.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{GasPriceQuote, OrderDescriptor, SendParams, TransactionEvent};
use crate::error::Result;

/// Something that can turn an order into a transaction.
pub trait TradeVenue: Send + Sync {
    /// Build (but do not submit) the transaction taking `order`.
    fn take_order(&self, order: &OrderDescriptor) -> Box<dyn OrderTransaction>;

    /// Venue name for logging.
    fn venue_name(&self) -> &'static str;
}

/// The lifecycle primitives of a single built transaction.
///
/// `send` consumes the transaction: once broadcast it cannot be re-sent.
#[async_trait]
pub trait OrderTransaction: Send {
    /// Check the order against current contract-level preconditions.
    async fn validate(&mut self) -> Result<()>;

    /// Estimate gas and nonce at the given gas price.
    async fn prepare(&mut self, gas_price: &GasPriceQuote) -> Result<SendParams>;

    /// Broadcast the transaction.
    ///
    /// The returned channel yields zero or more
    /// [`TransactionEvent::Pending`] notifications followed by exactly one
    /// terminal event. Dropping the sender without a terminal event is
    /// treated as a failure by the executor.
    async fn send(self: Box<Self>, params: SendParams) -> Result<mpsc::Receiver<TransactionEvent>>;
}
