//! The self-rescheduling cycle loop.
//!
//! A cycle walks the fixed stage sequence
//! `Evaluating -> Quoting -> Deciding -> Building -> GasPricing -> Executing`
//! and always ends in exactly one [`CycleOutcome`]. Every error is caught
//! here and turned into a `Failed` outcome; nothing escapes the loop. The
//! next cycle starts a fixed interval after the previous one settles, so
//! cycles never overlap.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::cycle::{CycleOutcome, CycleReport, CycleStage, SkipReason};
use crate::application::{
    until_cancelled, BalanceEvaluator, DecisionPolicy, OrderBuilder, PositionAssessment,
    QuoteEngine, TransactionExecutor,
};
use crate::error::{Error, Result};
use crate::port::{FundAccounting, GasPriceOracle, TradeVenue};

/// Everything a cycle needs, wired once at startup.
pub struct Pipeline {
    pub accounting: Arc<dyn FundAccounting>,
    pub evaluator: BalanceEvaluator,
    pub quotes: QuoteEngine,
    pub policy: Box<dyn DecisionPolicy>,
    pub orders: OrderBuilder,
    pub gas: Arc<dyn GasPriceOracle>,
    /// Confirmation-time ceiling handed to the gas oracle.
    pub max_wait_minutes: Decimal,
    pub venue: Arc<dyn TradeVenue>,
    pub executor: TransactionExecutor,
    /// Stop after building the order.
    pub dry_run: bool,
}

pub struct CycleScheduler {
    pipeline: Pipeline,
    interval: Duration,
    stage: CycleStage,
    cycles: u64,
    reports: Option<mpsc::UnboundedSender<CycleReport>>,
}

impl CycleScheduler {
    #[must_use]
    pub fn new(pipeline: Pipeline, interval: Duration) -> Self {
        Self {
            pipeline,
            interval,
            stage: CycleStage::Idle,
            cycles: 0,
            reports: None,
        }
    }

    /// Receive a report for every cycle completed by [`Self::run`].
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<CycleReport> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.reports = Some(tx);
        rx
    }

    #[must_use]
    pub const fn stage(&self) -> CycleStage {
        self.stage
    }

    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Run cycles until `cancel` fires. Returns the number of cycles run.
    pub async fn run(&mut self, cancel: CancellationToken) -> u64 {
        info!(
            interval_secs = self.interval.as_secs(),
            dry_run = self.pipeline.dry_run,
            policy = self.pipeline.policy.name(),
            venue = self.pipeline.venue.venue_name(),
            "Scheduler started"
        );

        while !cancel.is_cancelled() {
            let report = self.run_cycle(&cancel).await;
            let cancelled = matches!(report.outcome, CycleOutcome::Cancelled { .. });
            if let Some(reports) = &self.reports {
                let _ = reports.send(report);
            }
            if cancelled {
                break;
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(self.interval) => {}
            }
        }

        info!(cycles = self.cycles, "Scheduler stopped");
        self.cycles
    }

    /// Run exactly one cycle to its outcome.
    pub async fn run_cycle(&mut self, cancel: &CancellationToken) -> CycleReport {
        self.cycles += 1;
        let id = Uuid::new_v4();
        let number = self.cycles;
        let started_at = Utc::now();
        let span = info_span!("cycle", id = %id, n = number);

        let outcome = async {
            let outcome = match self.attempt(cancel).await {
                Ok(outcome) => outcome,
                Err(Error::Cancelled) => CycleOutcome::Cancelled { stage: self.stage },
                Err(error) => CycleOutcome::Failed {
                    stage: self.stage,
                    error,
                },
            };
            log_outcome(&outcome);
            outcome
        }
        .instrument(span)
        .await;

        self.stage = CycleStage::Idle;
        CycleReport {
            id,
            number,
            started_at,
            finished_at: Utc::now(),
            outcome,
        }
    }

    /// Move to `stage`, honoring cancellation between stages.
    fn enter(&mut self, stage: CycleStage, cancel: &CancellationToken) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        self.stage = stage;
        Ok(())
    }

    async fn attempt(&mut self, cancel: &CancellationToken) -> Result<CycleOutcome> {
        self.enter(CycleStage::Evaluating, cancel)?;
        info!("Evaluating fund holdings");
        let holdings = until_cancelled(cancel, self.pipeline.accounting.holdings()).await?;
        let position = match self.pipeline.evaluator.evaluate(&holdings)? {
            PositionAssessment::Held(position) => position,
            PositionAssessment::NoPosition => return Ok(CycleOutcome::Skipped(SkipReason::NoPosition)),
        };
        info!(
            base = %position.base,
            quote = %position.quote,
            quantity = %position.quantity,
            "Position evaluated"
        );

        self.enter(CycleStage::Quoting, cancel)?;
        let quote = until_cancelled(
            cancel,
            self.pipeline
                .quotes
                .get_quote(&position.base, &position.quote, position.quantity),
        )
        .await?;

        self.enter(CycleStage::Deciding, cancel)?;
        let policy = self.pipeline.policy.name();
        let trade = self.pipeline.policy.decide(&quote);
        info!(policy, trade, "Decision made");
        if !trade {
            return Ok(CycleOutcome::Skipped(SkipReason::Declined { policy }));
        }

        self.enter(CycleStage::Building, cancel)?;
        let order = self.pipeline.orders.build(&quote)?;
        if self.pipeline.dry_run {
            return Ok(CycleOutcome::Skipped(SkipReason::DryRun { order }));
        }

        self.enter(CycleStage::GasPricing, cancel)?;
        let gas_price =
            until_cancelled(cancel, self.pipeline.gas.resolve(self.pipeline.max_wait_minutes))
                .await?;

        self.enter(CycleStage::Executing, cancel)?;
        let tx = self.pipeline.venue.take_order(&order);
        let receipt = self.pipeline.executor.execute(tx, &gas_price, cancel).await?;

        Ok(CycleOutcome::Traded { order, receipt })
    }
}

fn log_outcome(outcome: &CycleOutcome) {
    match outcome {
        CycleOutcome::Traded { receipt, .. } => info!(
            outcome = outcome.label(),
            tx_hash = %receipt.tx_hash,
            gas_used = receipt.gas_used,
            "Cycle finished"
        ),
        CycleOutcome::Skipped(reason) => {
            info!(outcome = outcome.label(), reason = %reason, "Cycle finished");
        }
        CycleOutcome::Failed { stage, error } => error!(
            outcome = outcome.label(),
            stage = %stage,
            kind = error.kind(),
            error = %error,
            "Cycle failed, continuing"
        ),
        CycleOutcome::Cancelled { stage } => {
            warn!(outcome = outcome.label(), stage = %stage, "Cycle cancelled");
        }
    }
}
