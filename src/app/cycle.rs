//! Per-cycle stages, outcomes and reports.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{OrderDescriptor, TransactionReceipt};
use crate::error::Error;

/// Where a cycle is in its fixed stage sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStage {
    Idle,
    Evaluating,
    Quoting,
    Deciding,
    Building,
    GasPricing,
    Executing,
}

impl fmt::Display for CycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Evaluating => "evaluating",
            Self::Quoting => "quoting",
            Self::Deciding => "deciding",
            Self::Building => "building",
            Self::GasPricing => "gas_pricing",
            Self::Executing => "executing",
        };
        f.write_str(label)
    }
}

/// Why a cycle ended without trading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Both balances were dust.
    NoPosition,
    /// The decision policy said no.
    Declined { policy: &'static str },
    /// An order was built but dry-run mode forbids sending it.
    DryRun { order: OrderDescriptor },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPosition => f.write_str("no_position"),
            Self::Declined { .. } => f.write_str("declined"),
            Self::DryRun { .. } => f.write_str("dry_run"),
        }
    }
}

#[derive(Debug)]
pub enum CycleOutcome {
    Traded {
        order: OrderDescriptor,
        receipt: TransactionReceipt,
    },
    Skipped(SkipReason),
    Failed {
        stage: CycleStage,
        error: Error,
    },
    /// Shutdown was requested before the cycle could finish.
    Cancelled { stage: CycleStage },
}

impl CycleOutcome {
    /// `traded`, `skipped`, `failed` or `cancelled`.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Traded { .. } => "traded",
            Self::Skipped(_) => "skipped",
            Self::Failed { .. } => "failed",
            Self::Cancelled { .. } => "cancelled",
        }
    }
}

#[derive(Debug)]
pub struct CycleReport {
    pub id: Uuid,
    /// 1-based count of cycles run by this scheduler.
    pub number: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: CycleOutcome,
}
