//! In-memory port implementations with scripted behavior.
//!
//! Each double records what it was asked into a shared [`Journal`] so tests
//! can assert on call order across components.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::domain::{
    units, GasPriceQuote, Holding, OrderDescriptor, SendParams, TokenDefinition, TransactionEvent,
};
use crate::error::{Error, ExecutionError, GasPriceError, Result};
use crate::port::{
    ExchangePricer, ExchangeRegistry, FundAccounting, GasPriceOracle, OrderTransaction, TradeVenue,
};

/// Ordered log of calls shared between doubles.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.lock().iter().filter(|e| *e == entry).count()
    }
}

// ---------------------------------------------------------------------------
// Accounting
// ---------------------------------------------------------------------------

/// One scripted response to a holdings query.
#[derive(Debug, Clone)]
pub enum HoldingsStep {
    Snapshot(Vec<Holding>),
    Fail(String),
}

/// Returns scripted snapshots in order, repeating the last one forever.
///
/// Also tracks how many queries overlap so scheduler tests can prove cycles
/// never run concurrently.
pub struct ScriptedAccounting {
    steps: Mutex<Vec<HoldingsStep>>,
    journal: Journal,
    delay: Option<Duration>,
    cancel_after: Option<(usize, CancellationToken)>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedAccounting {
    pub fn new(steps: Vec<HoldingsStep>, journal: Journal) -> Self {
        Self {
            steps: Mutex::new(steps),
            journal,
            delay: None,
            cancel_after: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Always returns the same snapshot.
    pub fn fixed(holdings: Vec<Holding>, journal: Journal) -> Self {
        Self::new(vec![HoldingsStep::Snapshot(holdings)], journal)
    }

    /// Sleep for `delay` inside every query.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Cancel `token` during the `n`th query (1-based).
    pub fn cancel_after(mut self, n: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((n, token));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of queries observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn next_step(&self) -> HoldingsStep {
        let mut steps = self.steps.lock();
        if steps.len() > 1 {
            steps.remove(0)
        } else {
            steps
                .first()
                .cloned()
                .unwrap_or(HoldingsStep::Snapshot(Vec::new()))
        }
    }
}

#[async_trait]
impl FundAccounting for ScriptedAccounting {
    async fn holdings(&self) -> Result<Vec<Holding>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.journal.record("holdings");

        if let Some((n, token)) = &self.cancel_after {
            if call == *n {
                token.cancel();
            }
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match self.next_step() {
            HoldingsStep::Snapshot(holdings) => Ok(holdings),
            HoldingsStep::Fail(reason) => Err(Error::Rpc(reason)),
        }
    }
}

// ---------------------------------------------------------------------------
// Exchange
// ---------------------------------------------------------------------------

/// A recorded price query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceCall {
    AnchorToToken { exchange: Address, amount: U256 },
    TokenToAnchor { exchange: Address, amount: U256 },
}

/// Exchange registry and pricer with fixed outputs.
///
/// Outputs are independent of input size; tests choose them to match the
/// scenario under test.
#[derive(Default)]
pub struct StaticExchange {
    exchanges: HashMap<Address, Address>,
    anchor_to_token: Option<U256>,
    token_to_anchor: Option<U256>,
    calls: Mutex<Vec<PriceCall>>,
}

impl StaticExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exchange(mut self, token: &TokenDefinition, exchange: Address) -> Self {
        self.exchanges.insert(token.address, exchange);
        self
    }

    /// Amount of token returned when selling the anchor.
    pub fn with_anchor_to_token(mut self, out: Decimal, decimals: u8) -> Self {
        self.anchor_to_token = Some(units::to_base_units(out, decimals).expect("representable"));
        self
    }

    /// Amount of anchor returned when selling the token.
    pub fn with_token_to_anchor(mut self, out: Decimal, decimals: u8) -> Self {
        self.token_to_anchor = Some(units::to_base_units(out, decimals).expect("representable"));
        self
    }

    pub fn calls(&self) -> Vec<PriceCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ExchangeRegistry for StaticExchange {
    async fn exchange_for(&self, token: Address) -> Result<Option<Address>> {
        Ok(self.exchanges.get(&token).copied())
    }
}

#[async_trait]
impl ExchangePricer for StaticExchange {
    async fn anchor_to_token(&self, exchange: Address, anchor_in: U256) -> Result<U256> {
        self.calls.lock().push(PriceCall::AnchorToToken {
            exchange,
            amount: anchor_in,
        });
        self.anchor_to_token
            .ok_or_else(|| Error::Rpc("anchor->token price not scripted".into()))
    }

    async fn token_to_anchor(&self, exchange: Address, token_in: U256) -> Result<U256> {
        self.calls.lock().push(PriceCall::TokenToAnchor {
            exchange,
            amount: token_in,
        });
        self.token_to_anchor
            .ok_or_else(|| Error::Rpc("token->anchor price not scripted".into()))
    }
}

// ---------------------------------------------------------------------------
// Gas
// ---------------------------------------------------------------------------

/// Gas oracle returning a fixed quote, or failing.
pub struct FixedGasOracle {
    quote: Option<GasPriceQuote>,
    journal: Journal,
}

impl FixedGasOracle {
    pub fn new(quote: GasPriceQuote, journal: Journal) -> Self {
        Self {
            quote: Some(quote),
            journal,
        }
    }

    pub fn unavailable(journal: Journal) -> Self {
        Self {
            quote: None,
            journal,
        }
    }
}

#[async_trait]
impl GasPriceOracle for FixedGasOracle {
    async fn resolve(&self, max_wait_minutes: Decimal) -> Result<GasPriceQuote> {
        self.journal.record("gas");
        self.quote
            .map(|q| GasPriceQuote {
                max_wait_minutes,
                ..q
            })
            .ok_or_else(|| GasPriceError::Unavailable("scripted outage".into()).into())
    }
}

// ---------------------------------------------------------------------------
// Venue and transactions
// ---------------------------------------------------------------------------

/// How a scripted transaction behaves at each lifecycle step.
#[derive(Debug, Clone)]
pub struct TransactionScript {
    pub validate: std::result::Result<(), ExecutionError>,
    pub prepare: std::result::Result<SendParams, ExecutionError>,
    pub send: std::result::Result<(), ExecutionError>,
    /// Events emitted after a successful send.
    pub events: Vec<TransactionEvent>,
    /// Pause before each emitted event.
    pub event_delay: Option<Duration>,
    /// Cancelled the moment `send` is called.
    pub cancel_on_send: Option<CancellationToken>,
}

impl TransactionScript {
    /// Every step succeeds and `events` are emitted after sending.
    pub fn confirming(events: Vec<TransactionEvent>) -> Self {
        Self {
            validate: Ok(()),
            prepare: Ok(SendParams {
                gas_limit: 650_000,
                gas_price: 3_000_000_000,
                nonce: 7,
            }),
            send: Ok(()),
            events,
            event_delay: None,
            cancel_on_send: None,
        }
    }
}

pub struct ScriptedTransaction {
    script: TransactionScript,
    journal: Journal,
}

impl ScriptedTransaction {
    pub fn new(script: TransactionScript, journal: Journal) -> Self {
        Self { script, journal }
    }
}

#[async_trait]
impl OrderTransaction for ScriptedTransaction {
    async fn validate(&mut self) -> Result<()> {
        self.journal.record("validate");
        self.script.validate.clone().map_err(Into::into)
    }

    async fn prepare(&mut self, gas_price: &GasPriceQuote) -> Result<SendParams> {
        self.journal.record("prepare");
        self.script
            .prepare
            .clone()
            .map(|params| SendParams {
                gas_price: gas_price.wei_per_gas,
                ..params
            })
            .map_err(Into::into)
    }

    async fn send(self: Box<Self>, _params: SendParams) -> Result<mpsc::Receiver<TransactionEvent>> {
        self.journal.record("send");
        if let Some(token) = &self.script.cancel_on_send {
            token.cancel();
        }
        self.script.send.clone()?;

        let (tx, rx) = mpsc::channel(16);
        let events = self.script.events.clone();
        let delay = self.script.event_delay;
        let journal = self.journal.clone();
        tokio::spawn(async move {
            let mut settled = false;
            for event in events {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                let terminal = !matches!(event, TransactionEvent::Pending(_));
                if tx.send(event).await.is_err() {
                    return;
                }
                if terminal && !settled {
                    settled = true;
                    journal.record("settled");
                }
            }
        });
        Ok(rx)
    }
}

/// Venue producing [`ScriptedTransaction`]s and recording taken orders.
pub struct ScriptedVenue {
    script: TransactionScript,
    journal: Journal,
    orders: Mutex<Vec<OrderDescriptor>>,
}

impl ScriptedVenue {
    pub fn new(script: TransactionScript, journal: Journal) -> Self {
        Self {
            script,
            journal,
            orders: Mutex::new(Vec::new()),
        }
    }

    pub fn orders(&self) -> Vec<OrderDescriptor> {
        self.orders.lock().clone()
    }
}

impl TradeVenue for ScriptedVenue {
    fn take_order(&self, order: &OrderDescriptor) -> Box<dyn OrderTransaction> {
        self.orders.lock().push(*order);
        self.journal.record("take_order");
        Box::new(ScriptedTransaction::new(
            self.script.clone(),
            self.journal.clone(),
        ))
    }

    fn venue_name(&self) -> &'static str {
        "scripted"
    }
}
