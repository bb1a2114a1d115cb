#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;
use seesaw::app::{CycleOutcome, CycleScheduler, Pipeline};
use seesaw::application::{
    AlwaysTrade, BalanceEvaluator, DecisionPolicy, OrderBuilder, QuoteEngine, TransactionExecutor,
};
use seesaw::domain::{Quote, TransactionEvent};
use seesaw::testkit::domain::{exchange_address, gas_quote, holding, mln, pair, receipt, tx_hash, weth};
use seesaw::testkit::ports::{
    FixedGasOracle, HoldingsStep, Journal, ScriptedAccounting, ScriptedVenue, StaticExchange,
    TransactionScript,
};
use tokio_util::sync::CancellationToken;

/// Policy that never trades.
pub struct Never;

impl DecisionPolicy for Never {
    fn name(&self) -> &'static str {
        "never"
    }

    fn decide(&self, _quote: &Quote) -> bool {
        false
    }
}

/// Handles to the doubles behind a scheduler.
pub struct Fixture {
    pub journal: Journal,
    pub accounting: Arc<ScriptedAccounting>,
    pub exchange: Arc<StaticExchange>,
    pub venue: Arc<ScriptedVenue>,
}

/// Scheduler wired to scripted doubles.
///
/// Defaults: the fund holds 5 MLN, the MLN exchange quotes 50 MLN per 2 WETH
/// and 1.9 WETH per 5 MLN, gas is 3 gwei, the policy always trades and the
/// transaction confirms after one pending notification.
pub struct FixtureBuilder {
    holdings: Vec<HoldingsStep>,
    exchange: StaticExchange,
    script: TransactionScript,
    gas_available: bool,
    policy: Box<dyn DecisionPolicy>,
    dry_run: bool,
    interval: Duration,
    delay: Option<Duration>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl Default for FixtureBuilder {
    fn default() -> Self {
        Self {
            holdings: vec![HoldingsStep::Snapshot(vec![
                holding(&weth(), dec!(0)),
                holding(&mln(), dec!(5)),
            ])],
            exchange: StaticExchange::new()
                .with_exchange(&mln(), exchange_address())
                .with_anchor_to_token(dec!(50), 18)
                .with_token_to_anchor(dec!(1.9), 18),
            script: TransactionScript::confirming(vec![
                TransactionEvent::Pending(tx_hash(9)),
                TransactionEvent::Confirmed(receipt(9)),
            ]),
            gas_available: true,
            policy: Box::new(AlwaysTrade),
            dry_run: false,
            interval: Duration::from_millis(10),
            delay: None,
            cancel_after: None,
        }
    }
}

impl FixtureBuilder {
    pub fn holdings(mut self, steps: Vec<HoldingsStep>) -> Self {
        self.holdings = steps;
        self
    }

    pub fn exchange(mut self, exchange: StaticExchange) -> Self {
        self.exchange = exchange;
        self
    }

    pub fn script(mut self, script: TransactionScript) -> Self {
        self.script = script;
        self
    }

    pub fn gas_unavailable(mut self) -> Self {
        self.gas_available = false;
        self
    }

    pub fn policy(mut self, policy: Box<dyn DecisionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn accounting_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn cancel_after(mut self, holdings_calls: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((holdings_calls, token));
        self
    }

    pub fn build(self) -> (CycleScheduler, Fixture) {
        let journal = Journal::default();

        let mut accounting = ScriptedAccounting::new(self.holdings, journal.clone());
        if let Some(delay) = self.delay {
            accounting = accounting.with_delay(delay);
        }
        if let Some((n, token)) = self.cancel_after {
            accounting = accounting.cancel_after(n, token);
        }
        let accounting = Arc::new(accounting);
        let exchange = Arc::new(self.exchange);
        let venue = Arc::new(ScriptedVenue::new(self.script, journal.clone()));
        let gas = if self.gas_available {
            FixedGasOracle::new(gas_quote(3), journal.clone())
        } else {
            FixedGasOracle::unavailable(journal.clone())
        };

        let pipeline = Pipeline {
            accounting: accounting.clone(),
            evaluator: BalanceEvaluator::new(pair(), dec!(0.1)).unwrap(),
            quotes: QuoteEngine::new(weth(), exchange.clone(), exchange.clone()),
            policy: self.policy,
            orders: OrderBuilder::new(dec!(0.97)).unwrap(),
            gas: Arc::new(gas),
            max_wait_minutes: dec!(2),
            venue: venue.clone(),
            executor: TransactionExecutor::default(),
            dry_run: self.dry_run,
        };

        (
            CycleScheduler::new(pipeline, self.interval),
            Fixture {
                journal,
                accounting,
                exchange,
                venue,
            },
        )
    }
}

/// Journal entries up to and including the first `send`.
pub fn until_send(journal: &Journal) -> Vec<String> {
    let entries = journal.entries();
    match entries.iter().position(|e| e == "send") {
        Some(i) => entries[..=i].to_vec(),
        None => entries,
    }
}

pub fn describe(outcome: &CycleOutcome) -> String {
    match outcome {
        CycleOutcome::Failed { stage, error } => format!("failed at {stage}: {error}"),
        CycleOutcome::Cancelled { stage } => format!("cancelled at {stage}"),
        other => other.label().to_string(),
    }
}
