//! Single-cycle behavior of the full pipeline against scripted collaborators.

mod support;

use alloy_primitives::U256;
use rust_decimal_macros::dec;
use seesaw::app::{CycleOutcome, CycleStage, SkipReason};
use seesaw::error::{Error, ExecutionError, GasPriceError, QuoteError};
use seesaw::domain::TransactionEvent;
use seesaw::testkit::domain::{exchange_address, holding, mln, receipt, tx_hash, weth};
use seesaw::testkit::ports::{HoldingsStep, PriceCall, StaticExchange, TransactionScript};
use support::{describe, until_send, FixtureBuilder, Never};
use tokio_util::sync::CancellationToken;

const E18: u128 = 1_000_000_000_000_000_000;

#[tokio::test]
async fn held_token_is_sold_for_the_anchor() {
    let (mut scheduler, fx) = FixtureBuilder::default().build();

    let report = scheduler.run_cycle(&CancellationToken::new()).await;

    match report.outcome {
        CycleOutcome::Traded { order, receipt: r } => {
            assert_eq!(r, receipt(9));
            assert_eq!(order.taker_asset, mln().address);
            assert_eq!(order.maker_asset, weth().address);
            assert_eq!(order.taker_quantity, U256::from(5 * E18));
            // floor(1.9 * 0.97 * 10^18)
            assert_eq!(order.maker_quantity, U256::from(1_843_000_000_000_000_000u128));
        }
        other => panic!("expected a trade, got {}", describe(&other)),
    }

    assert_eq!(
        fx.exchange.calls(),
        vec![PriceCall::TokenToAnchor {
            exchange: exchange_address(),
            amount: U256::from(5 * E18),
        }]
    );
    assert_eq!(
        until_send(&fx.journal),
        vec!["holdings", "gas", "take_order", "validate", "prepare", "send"]
    );
    assert_eq!(scheduler.stage(), CycleStage::Idle);
    assert_eq!(report.number, 1);
}

#[tokio::test]
async fn held_anchor_is_sold_for_the_token() {
    let (mut scheduler, fx) = FixtureBuilder::default()
        .holdings(vec![HoldingsStep::Snapshot(vec![
            holding(&weth(), dec!(2)),
            holding(&mln(), dec!(0.01)),
        ])])
        .build();

    let report = scheduler.run_cycle(&CancellationToken::new()).await;

    let CycleOutcome::Traded { order, .. } = &report.outcome else {
        panic!("expected a trade, got {}", describe(&report.outcome));
    };
    assert_eq!(order.taker_asset, weth().address);
    assert_eq!(order.maker_asset, mln().address);
    assert_eq!(order.taker_quantity, U256::from(2 * E18));
    // floor(50 * 0.97 * 10^18)
    assert_eq!(order.maker_quantity, U256::from(48_500_000_000_000_000_000u128));
    assert_eq!(
        fx.exchange.calls(),
        vec![PriceCall::AnchorToToken {
            exchange: exchange_address(),
            amount: U256::from(2 * E18),
        }]
    );
}

#[tokio::test]
async fn dust_only_fund_skips_without_quoting() {
    let (mut scheduler, fx) = FixtureBuilder::default()
        .holdings(vec![HoldingsStep::Snapshot(vec![
            holding(&weth(), dec!(0.05)),
            holding(&mln(), dec!(0.1)),
        ])])
        .build();

    let report = scheduler.run_cycle(&CancellationToken::new()).await;

    assert!(matches!(report.outcome, CycleOutcome::Skipped(SkipReason::NoPosition)));
    assert!(fx.exchange.calls().is_empty());
    assert_eq!(fx.journal.entries(), vec!["holdings"]);
}

#[tokio::test]
async fn declined_decision_builds_nothing() {
    let (mut scheduler, fx) = FixtureBuilder::default().policy(Box::new(Never)).build();

    let report = scheduler.run_cycle(&CancellationToken::new()).await;

    assert!(matches!(
        report.outcome,
        CycleOutcome::Skipped(SkipReason::Declined { policy: "never" })
    ));
    assert_eq!(fx.exchange.calls().len(), 1);
    assert!(fx.venue.orders().is_empty());
    assert_eq!(fx.journal.count("gas"), 0);
}

#[tokio::test]
async fn dry_run_builds_but_never_submits() {
    let (mut scheduler, fx) = FixtureBuilder::default().dry_run().build();

    let report = scheduler.run_cycle(&CancellationToken::new()).await;

    match report.outcome {
        CycleOutcome::Skipped(SkipReason::DryRun { order }) => {
            assert_eq!(order.taker_quantity, U256::from(5 * E18));
        }
        other => panic!("expected dry-run skip, got {}", describe(&other)),
    }
    assert!(fx.venue.orders().is_empty());
    assert_eq!(fx.journal.entries(), vec!["holdings"]);
}

#[tokio::test]
async fn missing_exchange_fails_the_cycle_before_building() {
    let (mut scheduler, fx) = FixtureBuilder::default()
        .exchange(StaticExchange::new().with_token_to_anchor(dec!(1), 18))
        .build();

    let report = scheduler.run_cycle(&CancellationToken::new()).await;

    match report.outcome {
        CycleOutcome::Failed {
            stage: CycleStage::Quoting,
            error: Error::Quote(QuoteError::ExchangeNotFound { symbol, .. }),
        } => assert_eq!(symbol, "MLN"),
        other => panic!("expected ExchangeNotFound, got {}", describe(&other)),
    }
    assert!(fx.venue.orders().is_empty());
    assert_eq!(fx.journal.entries(), vec!["holdings"]);
}

#[tokio::test]
async fn gas_outage_aborts_the_trade_step() {
    let (mut scheduler, fx) = FixtureBuilder::default().gas_unavailable().build();

    let report = scheduler.run_cycle(&CancellationToken::new()).await;

    assert!(matches!(
        report.outcome,
        CycleOutcome::Failed {
            stage: CycleStage::GasPricing,
            error: Error::GasPrice(GasPriceError::Unavailable(_)),
        }
    ));
    assert!(fx.venue.orders().is_empty());
}

#[tokio::test]
async fn invalid_transaction_is_never_sent() {
    let script = TransactionScript {
        validate: Err(ExecutionError::Validation("maker asset not registered".into())),
        ..TransactionScript::confirming(vec![])
    };
    let (mut scheduler, fx) = FixtureBuilder::default().script(script).build();

    let report = scheduler.run_cycle(&CancellationToken::new()).await;

    assert!(matches!(
        report.outcome,
        CycleOutcome::Failed {
            stage: CycleStage::Executing,
            error: Error::Execution(ExecutionError::Validation(_)),
        }
    ));
    assert_eq!(fx.journal.count("send"), 0);
}

#[tokio::test]
async fn reverted_transaction_fails_once() {
    let script = TransactionScript::confirming(vec![
        TransactionEvent::Pending(tx_hash(3)),
        TransactionEvent::Failed(ExecutionError::Reverted {
            tx_hash: tx_hash(3).to_string(),
        }),
        TransactionEvent::Confirmed(receipt(3)),
    ]);
    let (mut scheduler, _fx) = FixtureBuilder::default().script(script).build();

    let report = scheduler.run_cycle(&CancellationToken::new()).await;

    assert!(matches!(
        report.outcome,
        CycleOutcome::Failed {
            stage: CycleStage::Executing,
            error: Error::Execution(ExecutionError::Reverted { .. }),
        }
    ));
}

#[tokio::test]
async fn accounting_failure_is_contained() {
    let (mut scheduler, fx) = FixtureBuilder::default()
        .holdings(vec![HoldingsStep::Fail("connection reset".into())])
        .build();

    let report = scheduler.run_cycle(&CancellationToken::new()).await;

    match report.outcome {
        CycleOutcome::Failed {
            stage: CycleStage::Evaluating,
            error,
        } => assert_eq!(error.kind(), "rpc"),
        other => panic!("expected rpc failure, got {}", describe(&other)),
    }
    assert!(fx.exchange.calls().is_empty());
}

#[tokio::test]
async fn cancellation_before_the_cycle_touches_nothing() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let (mut scheduler, fx) = FixtureBuilder::default().build();

    let report = scheduler.run_cycle(&cancel).await;

    assert!(matches!(
        report.outcome,
        CycleOutcome::Cancelled {
            stage: CycleStage::Idle
        }
    ));
    assert_eq!(fx.accounting.calls(), 0);
}

#[tokio::test]
async fn cancellation_between_stages_stops_before_quoting() {
    let cancel = CancellationToken::new();
    let (mut scheduler, fx) = FixtureBuilder::default()
        .cancel_after(1, cancel.clone())
        .build();

    let report = scheduler.run_cycle(&cancel).await;

    assert!(matches!(
        report.outcome,
        CycleOutcome::Cancelled {
            stage: CycleStage::Evaluating
        }
    ));
    assert!(fx.exchange.calls().is_empty());
    assert!(fx.venue.orders().is_empty());
}

#[tokio::test]
async fn both_tokens_held_trades_the_larger() {
    let (mut scheduler, fx) = FixtureBuilder::default()
        .holdings(vec![HoldingsStep::Snapshot(vec![
            holding(&weth(), dec!(1)),
            holding(&mln(), dec!(4)),
        ])])
        .build();

    let report = scheduler.run_cycle(&CancellationToken::new()).await;

    assert!(matches!(report.outcome, CycleOutcome::Traded { .. }));
    assert!(matches!(
        fx.exchange.calls().as_slice(),
        [PriceCall::TokenToAnchor { .. }]
    ));
}
