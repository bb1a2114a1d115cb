//! Transaction lifecycle types.

use std::fmt;

use alloy_primitives::TxHash;

use crate::error::ExecutionError;

/// Lifecycle of a single order transaction.
///
/// `Confirmed` and `Failed` are terminal; exactly one is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Built,
    Validated,
    Prepared,
    Sent,
    Confirmed,
    Failed,
}

impl TransactionState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed)
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Built => "built",
            Self::Validated => "validated",
            Self::Prepared => "prepared",
            Self::Sent => "sent",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Send-ready parameters produced by the prepare step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendParams {
    pub gas_limit: u64,
    pub gas_price: u128,
    pub nonce: u64,
}

/// Settlement details of a confirmed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub tx_hash: TxHash,
    pub gas_used: u64,
    pub block_number: Option<u64>,
}

/// Notifications emitted by a broadcast transaction.
///
/// Any number of `Pending` events may arrive before exactly one
/// `Confirmed` or `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionEvent {
    Pending(TxHash),
    Confirmed(TransactionReceipt),
    Failed(ExecutionError),
}
