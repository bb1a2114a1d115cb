//! Driving an order transaction to exactly one terminal state.
//!
//! ```text
//! Built -> Validated -> Prepared -> Sent -> Confirmed
//!   \          \            \         \
//!    +----------+------------+---------+--> Failed
//! ```
//!
//! Cancellation is honored up to the send step. Once `send` has been issued
//! the transaction is always awaited until it confirms or fails.

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::until_cancelled;
use crate::domain::{GasPriceQuote, TransactionEvent, TransactionReceipt, TransactionState};
use crate::error::{ExecutionError, Result};
use crate::port::OrderTransaction;

/// Block explorer transaction URL prefix for well-known chains.
#[must_use]
pub fn explorer_tx_url(chain_id: u64) -> Option<&'static str> {
    match chain_id {
        1 => Some("https://etherscan.io/tx/"),
        11_155_111 => Some("https://sepolia.etherscan.io/tx/"),
        _ => None,
    }
}

/// State machine around one [`OrderTransaction`].
///
/// Owned by the executor for the duration of a single cycle.
pub struct TransactionHandle {
    tx: Option<Box<dyn OrderTransaction>>,
    state: TransactionState,
    history: Vec<TransactionState>,
}

impl TransactionHandle {
    #[must_use]
    pub fn new(tx: Box<dyn OrderTransaction>) -> Self {
        Self {
            tx: Some(tx),
            state: TransactionState::Built,
            history: vec![TransactionState::Built],
        }
    }

    #[must_use]
    pub const fn state(&self) -> TransactionState {
        self.state
    }

    /// Every state this handle has passed through, in order.
    #[must_use]
    pub fn history(&self) -> &[TransactionState] {
        &self.history
    }

    fn advance(&mut self, next: TransactionState) {
        debug_assert!(!self.state.is_terminal(), "transaction already settled");
        debug!(from = %self.state, to = %next, "Transaction state change");
        self.state = next;
        self.history.push(next);
    }

    /// Run the full lifecycle. Resolves exactly once; a settled handle is
    /// never driven again.
    ///
    /// # Errors
    ///
    /// Returns the first failure from validation, preparation, sending or
    /// settlement, or [`crate::error::Error::Cancelled`] if `cancel` fired
    /// before the transaction was sent. A handle that already settled yields
    /// [`ExecutionError::AlreadySettled`] and keeps its state.
    pub async fn run(
        &mut self,
        gas_price: &GasPriceQuote,
        cancel: &CancellationToken,
        explorer: Option<&str>,
    ) -> Result<TransactionReceipt> {
        if self.state.is_terminal() {
            return Err(ExecutionError::AlreadySettled(self.state).into());
        }

        let result = self.drive(gas_price, cancel, explorer).await;
        match &result {
            Ok(_) => self.advance(TransactionState::Confirmed),
            Err(_) => self.advance(TransactionState::Failed),
        }
        result
    }

    async fn drive(
        &mut self,
        gas_price: &GasPriceQuote,
        cancel: &CancellationToken,
        explorer: Option<&str>,
    ) -> Result<TransactionReceipt> {
        let mut tx = self
            .tx
            .take()
            .ok_or_else(|| ExecutionError::Send("transaction already consumed".into()))?;

        info!("Validating transaction");
        until_cancelled(cancel, tx.validate()).await?;
        self.advance(TransactionState::Validated);

        info!("Estimating transaction gas cost");
        let params = until_cancelled(cancel, tx.prepare(gas_price)).await?;
        self.advance(TransactionState::Prepared);

        // Last point at which the cycle may be abandoned.
        if cancel.is_cancelled() {
            return Err(crate::error::Error::Cancelled);
        }

        info!(
            gas_limit = params.gas_limit,
            gas_price_wei = params.gas_price,
            nonce = params.nonce,
            "Sending transaction"
        );
        let mut events = tx.send(params).await?;
        self.advance(TransactionState::Sent);

        while let Some(event) = events.recv().await {
            match event {
                TransactionEvent::Pending(hash) => match explorer {
                    Some(prefix) => info!(tx_hash = %hash, url = %format!("{prefix}{hash}"), "Transaction pending"),
                    None => info!(tx_hash = %hash, "Transaction pending"),
                },
                TransactionEvent::Confirmed(receipt) => {
                    info!(
                        tx_hash = %receipt.tx_hash,
                        gas_used = receipt.gas_used,
                        block = ?receipt.block_number,
                        "Transaction confirmed"
                    );
                    return Ok(receipt);
                }
                TransactionEvent::Failed(err) => {
                    error!(error = %err, "Transaction failed");
                    return Err(err.into());
                }
            }
        }

        warn!("Transaction event stream closed without a terminal event");
        Err(ExecutionError::StreamClosed.into())
    }
}

/// Executes order transactions, one at a time.
#[derive(Debug, Clone, Default)]
pub struct TransactionExecutor {
    explorer: Option<String>,
}

impl TransactionExecutor {
    #[must_use]
    pub fn new(explorer: Option<String>) -> Self {
        Self { explorer }
    }

    /// Executor that links pending transactions to the chain's explorer.
    #[must_use]
    pub fn for_chain(chain_id: u64) -> Self {
        Self::new(explorer_tx_url(chain_id).map(str::to_string))
    }

    /// Validate, prepare, send and settle `tx`.
    ///
    /// # Errors
    ///
    /// See [`TransactionHandle::run`].
    pub async fn execute(
        &self,
        tx: Box<dyn OrderTransaction>,
        gas_price: &GasPriceQuote,
        cancel: &CancellationToken,
    ) -> Result<TransactionReceipt> {
        let mut handle = TransactionHandle::new(tx);
        handle
            .run(gas_price, cancel, self.explorer.as_deref())
            .await
    }
}
